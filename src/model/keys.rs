//! Flat key sets (vault variable names and similar identifier lists).

use super::NormalizedMap;

/// A deduplicated, sorted set of keys.
///
/// Stored as a [`NormalizedMap`] with unit values so the same reconcile
/// primitive drives both the hierarchical and the flat comparators.
pub type KeySet = NormalizedMap<()>;

/// Build a sorted [`KeySet`] from any iterator of keys.
pub fn key_set<I, S>(keys: I) -> KeySet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut set: KeySet = keys.into_iter().map(|k| (k.into(), ())).collect();
    set.sort_keys();
    set
}
