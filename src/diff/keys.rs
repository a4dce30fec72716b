//! Flat key-set comparator (vault variable names).

use super::traits::{reconcile, ChangeComputer};
use crate::model::KeySet;
use serde::{Deserialize, Serialize};

/// Where a key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPresence {
    Both,
    SourceOnly,
    DestinationOnly,
}

impl KeyPresence {
    #[must_use]
    pub const fn in_source(self) -> bool {
        matches!(self, Self::Both | Self::SourceOnly)
    }

    #[must_use]
    pub const fn in_destination(self) -> bool {
        matches!(self, Self::Both | Self::DestinationOnly)
    }
}

/// Presence of one key across both environments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    pub key: String,
    pub presence: KeyPresence,
}

/// Every distinct key of both sides, sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyDiff {
    pub entries: Vec<KeyEntry>,
}

impl KeyDiff {
    /// Whether both sides hold exactly the same keys.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.entries.iter().all(|e| e.presence == KeyPresence::Both)
    }

    /// Keys present only in the destination.
    pub fn missing_in_source(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.presence == KeyPresence::DestinationOnly)
            .map(|e| e.key.as_str())
    }

    /// Keys present only in the source.
    pub fn missing_in_destination(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.presence == KeyPresence::SourceOnly)
            .map(|e| e.key.as_str())
    }
}

/// Compares two key sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyDiffEngine;

impl KeyDiffEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn compare(&self, source: &KeySet, destination: &KeySet) -> KeyDiff {
        let mut entries = reconcile(&PresenceComputer, source, destination);
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        KeyDiff { entries }
    }
}

/// Unlike the storage computers, this one also reports unchanged keys.
struct PresenceComputer;

impl PresenceComputer {
    fn entry(id: &str, presence: KeyPresence) -> KeyEntry {
        KeyEntry {
            key: id.to_string(),
            presence,
        }
    }
}

impl ChangeComputer for PresenceComputer {
    type Resource = ();
    type Event = KeyEntry;

    fn added(&self, id: &str, _: &(), events: &mut Vec<KeyEntry>) {
        events.push(Self::entry(id, KeyPresence::SourceOnly));
    }

    fn removed(&self, id: &str, _: &(), events: &mut Vec<KeyEntry>) {
        events.push(Self::entry(id, KeyPresence::DestinationOnly));
    }

    fn matched(&self, id: &str, _: &(), _: &(), events: &mut Vec<KeyEntry>) {
        events.push(Self::entry(id, KeyPresence::Both));
    }

    fn name(&self) -> &'static str {
        "PresenceComputer"
    }
}
