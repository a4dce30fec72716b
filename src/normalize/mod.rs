//! Structure normalization.
//!
//! Raw snapshot records carry plenty of volatile metadata (timestamps, row
//! counts, sizes). Normalizers keep only a fixed allow-list of fields per
//! resource kind so incidental metadata never shows up as a difference.
//! Normalizers borrow the raw document and never mutate it.

mod keys;
mod storage;

pub use keys::KeyNormalizer;
pub use storage::{
    StorageNormalizer, BRANCH_METADATA_KEY, BUCKET_KEYS, COLUMN_ID_KEYS, TABLE_KEYS,
};

use crate::error::Result;
use serde_json::{Map, Value};

/// Projects a raw snapshot document onto its normalized form.
pub trait Normalizer {
    /// The raw document shape this normalizer accepts.
    type Document;
    /// The normalized output.
    type Output;

    /// Normalize a document.
    fn normalize(&self, document: &Self::Document) -> Result<Self::Output>;

    /// Name of this normalizer for logging.
    fn name(&self) -> &str;
}

/// Keep only the allow-listed keys of `record`, in allow-list order.
///
/// Keys missing from the record are omitted, never defaulted.
#[must_use]
pub fn filter_keys(record: &Map<String, Value>, allow_list: &[&str]) -> Map<String, Value> {
    allow_list
        .iter()
        .filter_map(|key| record.get(*key).map(|v| ((*key).to_string(), v.clone())))
        .collect()
}
