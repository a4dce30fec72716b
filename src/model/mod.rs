//! Normalized data model.
//!
//! Raw snapshot records are projected onto these types by the
//! [`normalize`](crate::normalize) module before any comparison happens.
//! Every map is keyed by the resource's stable identifier and sorted by it.

mod keys;
mod storage;

pub use keys::{key_set, KeySet};
pub use storage::{
    NormalizedBucket, NormalizedTable, ResourceOrigin, StorageStructure, SHARING_FIELDS,
};

/// Resources keyed by stable identifier.
pub type NormalizedMap<R> = indexmap::IndexMap<String, R>;
