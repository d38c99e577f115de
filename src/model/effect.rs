//! Effect identifiers, name interning and the effect set type

use std::collections::HashMap;
use std::fmt;

/// Dense identifier for an interned effect name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EffectId(u16);

impl EffectId {
    /// Index into per-effect tables (multipliers, names)
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Interns effect names into dense `EffectId`s.
///
/// Every name seen while compiling a catalog gets an id, so rule conditions
/// that mention effects no substance ever produces are still representable;
/// they are simply never present in any set.
#[derive(Debug, Clone, Default)]
pub struct EffectRegistry {
    names: Vec<String>,
    ids: HashMap<String, EffectId>,
}

impl EffectRegistry {
    /// Maximum number of distinct effect names
    pub const MAX_EFFECTS: usize = u16::MAX as usize + 1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning its id. Returns `None` once the id space is exhausted.
    pub fn intern(&mut self, name: &str) -> Option<EffectId> {
        if let Some(&id) = self.ids.get(name) {
            return Some(id);
        }
        let raw = u16::try_from(self.names.len()).ok()?;
        let id = EffectId(raw);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        Some(id)
    }

    /// Look up an already interned name
    pub fn get(&self, name: &str) -> Option<EffectId> {
        self.ids.get(name).copied()
    }

    /// Name for an id produced by this registry
    pub fn name(&self, id: EffectId) -> &str {
        &self.names[id.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A set of effects.
///
/// Stored sorted and duplicate-free, so equality and hashing depend only on
/// content, never on the order effects were inserted in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EffectSet {
    ids: Vec<EffectId>,
}

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
        }
    }

    pub fn contains(&self, id: EffectId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Insert an effect. Returns `true` if it was not already present.
    pub fn insert(&mut self, id: EffectId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.ids.insert(pos, id);
                true
            }
        }
    }

    /// Remove an effect. Returns `true` if it was present.
    pub fn remove(&mut self, id: EffectId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(pos) => {
                self.ids.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// True if every id in `ids` is present
    pub fn contains_all(&self, ids: &[EffectId]) -> bool {
        ids.iter().all(|&id| self.contains(id))
    }

    /// True if at least one id in `ids` is present
    pub fn contains_any(&self, ids: &[EffectId]) -> bool {
        ids.iter().any(|&id| self.contains(id))
    }

    /// Iterate in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = EffectId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<EffectId> for EffectSet {
    fn from_iter<I: IntoIterator<Item = EffectId>>(iter: I) -> Self {
        let mut ids: Vec<EffectId> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }
}
