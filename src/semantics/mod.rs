//! Rule and pricing semantics for mixes

pub mod pricing;
pub mod rules;

// Re-export main functionality
pub use pricing::{base_price_cents, calculate_cost, calculate_price, price_from_multiplier};
pub use rules::{DEFAULT_EFFECT_CAP, adds_default_effect, apply_rules, effects_for_mix};
