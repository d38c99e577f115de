//! Rule engine: applies one substance to an effect set

use crate::model::{CompiledAction, CompiledSubstance, EffectSet};

/// A substance's default effect is only added while fewer than this many
/// substances precede it in the mix.
pub const DEFAULT_EFFECT_CAP: usize = 9;

/// Whether a substance at 0-based mix position `mix_length_so_far` still
/// contributes its default effect.
pub fn adds_default_effect(mix_length_so_far: usize) -> bool {
    mix_length_so_far < DEFAULT_EFFECT_CAP
}

/// Apply `substance` to `effects`.
///
/// Conditions and exclusions of every rule are checked against the input set
/// as it was before this substance, never against the partially rewritten
/// working set, so earlier rules cannot enable or disable later ones. Rule
/// order still matters for the rewrites themselves.
pub fn apply_rules(
    effects: &EffectSet,
    substance: &CompiledSubstance,
    mix_length_so_far: usize,
) -> EffectSet {
    let original = effects;
    let mut working = effects.clone();

    for rule in &substance.rules {
        if !original.contains_all(&rule.condition) {
            continue;
        }
        if original.contains_any(&rule.if_not_present) {
            continue;
        }

        match rule.action {
            CompiledAction::Replace { target, with } => {
                if working.contains(target) && !working.contains(with) {
                    working.remove(target);
                    working.insert(with);
                }
            }
            CompiledAction::Add { target } => {
                working.insert(target);
            }
        }
    }

    if adds_default_effect(mix_length_so_far) {
        working.insert(substance.default_effect);
    }

    working
}

/// Effects after applying every substance of `path` in order, starting from
/// the catalog's initial effects.
pub fn effects_for_mix(catalog: &crate::model::Catalog, path: &[usize]) -> EffectSet {
    path.iter()
        .enumerate()
        .fold(catalog.initial_effects().clone(), |effects, (position, &index)| {
            apply_rules(&effects, catalog.substance(index), position)
        })
}
