//! Flat key set normalizer (vault snapshots).

use super::Normalizer;
use crate::error::Result;
use crate::model::{key_set, KeySet};
use crate::snapshot::KeyDocument;

/// Turns a list of key names into a sorted, de-duplicated [`KeySet`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyNormalizer;

impl KeyNormalizer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Normalizer for KeyNormalizer {
    type Document = KeyDocument;
    type Output = KeySet;

    fn normalize(&self, document: &KeyDocument) -> Result<KeySet> {
        let keys = key_set(document.iter().cloned());
        if keys.len() != document.len() {
            tracing::debug!(
                "Collapsed {} duplicate key name(s)",
                document.len() - keys.len()
            );
        }
        Ok(keys)
    }

    fn name(&self) -> &'static str {
        "KeyNormalizer"
    }
}
