//! Domain model: products, substances, rules, effects and the compiled catalog

pub mod catalog;
pub mod effect;
pub mod types;

// Re-export commonly used types
pub use catalog::{Catalog, CompiledAction, CompiledRule, CompiledSubstance};
pub use effect::{EffectId, EffectRegistry, EffectSet};
pub use types::{MultiplierTable, Product, Rule, RuleKind, Substance};
