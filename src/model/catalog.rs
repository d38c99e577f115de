//! Compiled, read-only view of a run's inputs
//!
//! A `Catalog` resolves every effect name to an `EffectId` once, so the hot
//! search loop only touches small integer sets and per-id tables.

use crate::error::{MixError, MixResult};
use crate::model::effect::{EffectId, EffectRegistry, EffectSet};
use crate::model::types::{MultiplierTable, Product, RuleKind, Substance};
use crate::semantics::pricing::{base_price_cents, price_from_multiplier};

/// Rule action with names resolved to ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompiledAction {
    Replace { target: EffectId, with: EffectId },
    Add { target: EffectId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    pub condition: Vec<EffectId>,
    pub if_not_present: Vec<EffectId>,
    pub action: CompiledAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSubstance {
    pub cost_cents: i64,
    pub default_effect: EffectId,
    pub rules: Vec<CompiledRule>,
}

/// Everything a search worker needs, shared read-only across threads
#[derive(Debug, Clone)]
pub struct Catalog {
    product_name: String,
    base_price_cents: i64,
    registry: EffectRegistry,
    initial_effects: EffectSet,
    substances: Vec<CompiledSubstance>,
    substance_names: Vec<String>,
    /// Indexed by `EffectId::index`
    multipliers: Vec<i64>,
}

impl Catalog {
    /// Compile the run inputs. Fails if `substances` is empty or the inputs
    /// mention more distinct effects than an `EffectId` can address.
    pub fn compile(
        product: &Product,
        substances: &[Substance],
        multipliers: &MultiplierTable,
    ) -> MixResult<Self> {
        if substances.is_empty() {
            return Err(MixError::NoSubstances);
        }

        let mut registry = EffectRegistry::new();
        let mut intern = |name: &str| {
            registry.intern(name).ok_or(MixError::TooManyEffects {
                limit: EffectRegistry::MAX_EFFECTS,
            })
        };

        let initial = intern(product.initial_effect.as_str())?;
        let mut compiled = Vec::with_capacity(substances.len());

        for substance in substances {
            let default_effect = intern(substance.default_effect.as_str())?;
            let mut rules = Vec::with_capacity(substance.rules.len());

            for rule in &substance.rules {
                let condition = rule
                    .condition
                    .iter()
                    .map(|n| intern(n.as_str()))
                    .collect::<MixResult<Vec<_>>>()?;
                let if_not_present = rule
                    .if_not_present
                    .iter()
                    .map(|n| intern(n.as_str()))
                    .collect::<MixResult<Vec<_>>>()?;
                let target = intern(rule.target.as_str())?;

                let action = match rule.kind {
                    RuleKind::Add => CompiledAction::Add { target },
                    RuleKind::Replace => match rule.with_effect.as_deref() {
                        Some(with) if !with.is_empty() => CompiledAction::Replace {
                            target,
                            with: intern(with)?,
                        },
                        // A replace with nothing to replace by never fires
                        _ => continue,
                    },
                };

                rules.push(CompiledRule {
                    condition,
                    if_not_present,
                    action,
                });
            }

            compiled.push(CompiledSubstance {
                cost_cents: substance.cost_cents,
                default_effect,
                rules,
            });
        }

        // Table entries for effects nothing can produce are irrelevant
        let mut table = vec![0; registry.len()];
        for (name, &multiplier) in multipliers {
            if let Some(id) = registry.get(name) {
                table[id.index()] = multiplier;
            }
        }

        let mut initial_effects = EffectSet::new();
        initial_effects.insert(initial);

        Ok(Self {
            product_name: product.name.clone(),
            base_price_cents: base_price_cents(&product.name),
            registry,
            initial_effects,
            substances: compiled,
            substance_names: substances.iter().map(|s| s.name.clone()).collect(),
            multipliers: table,
        })
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn base_price_cents(&self) -> i64 {
        self.base_price_cents
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    /// Effect set at depth 0: just the product's initial effect
    pub fn initial_effects(&self) -> &EffectSet {
        &self.initial_effects
    }

    pub fn substance_count(&self) -> usize {
        self.substances.len()
    }

    pub fn substance(&self, index: usize) -> &CompiledSubstance {
        &self.substances[index]
    }

    pub fn substance_name(&self, index: usize) -> &str {
        &self.substance_names[index]
    }

    pub fn cost_cents(&self, index: usize) -> i64 {
        self.substances[index].cost_cents
    }

    /// Sum of multipliers of every effect in the set
    pub fn total_multiplier(&self, effects: &EffectSet) -> i64 {
        effects.iter().map(|id| self.multipliers[id.index()]).sum()
    }

    pub fn sell_price_cents(&self, effects: &EffectSet) -> i64 {
        price_from_multiplier(self.base_price_cents, self.total_multiplier(effects))
    }

    /// Total cost of the substances at `path`
    pub fn mix_cost_cents(&self, path: &[usize]) -> i64 {
        path.iter().map(|&i| self.cost_cents(i)).sum()
    }

    /// Build a set from names. Names the catalog has never seen are absent.
    pub fn effect_set<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> EffectSet {
        names
            .into_iter()
            .filter_map(|name| self.registry.get(name))
            .collect()
    }

    /// Names of the effects in `set`, sorted alphabetically
    pub fn effect_names(&self, set: &EffectSet) -> Vec<String> {
        let mut names: Vec<String> = set
            .iter()
            .map(|id| self.registry.name(id).to_string())
            .collect();
        names.sort();
        names
    }

    /// Substance names along `path`
    pub fn mix_names(&self, path: &[usize]) -> Vec<String> {
        path.iter()
            .map(|&i| self.substance_names[i].clone())
            .collect()
    }
}
