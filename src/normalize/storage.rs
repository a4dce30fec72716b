//! Storage (bucket → table → column) normalizer.

use super::{filter_keys, Normalizer};
use crate::error::{Result, StructureDiffError};
use crate::model::{NormalizedBucket, NormalizedTable, ResourceOrigin, StorageStructure};
use crate::snapshot::{value_to_id, StorageDocument};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Bucket fields that take part in the comparison.
pub const BUCKET_KEYS: &[&str] = &[
    "id",
    "name",
    "stage",
    "displayName",
    "description",
    "backend",
    "sharing",
    "sharingParameters",
];

/// Table fields that take part in the comparison.
pub const TABLE_KEYS: &[&str] = &[
    "id",
    "isTyped",
    "name",
    "definition",
    "distributionType",
    "distributionKey",
    "indexType",
    "indexKey",
    "bucket",
    "primaryKey",
    "transactional",
    "columns",
    "syntheticPrimaryKeyEnabled",
    "columnMetadata",
];

/// Fields that identify a column when columns are objects rather than names.
pub const COLUMN_ID_KEYS: &[&str] = &["id", "name"];

/// Bucket metadata key naming the branch that created the bucket.
pub const BRANCH_METADATA_KEY: &str = "KBC.createdBy.branch.id";

/// Table keys carried in dedicated [`NormalizedTable`] fields.
const TABLE_STRUCTURED_KEYS: &[&str] = &["id", "bucket", "primaryKey", "columns", "columnMetadata"];

/// Normalizes storage snapshots into a [`StorageStructure`].
#[derive(Debug, Clone)]
pub struct StorageNormalizer {
    default_branch_only: bool,
}

impl StorageNormalizer {
    /// Create a normalizer that drops resources created on non-default branches.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            default_branch_only: true,
        }
    }

    /// Enable or disable the default-branch filter.
    #[must_use]
    pub const fn default_branch_only(mut self, enabled: bool) -> Self {
        self.default_branch_only = enabled;
        self
    }

    fn normalize_bucket(record: &Map<String, Value>, table_id: &str) -> Result<NormalizedBucket> {
        let id = record.get("id").and_then(value_to_id).ok_or_else(|| {
            StructureDiffError::unexpected_shape(
                format!("normalizing bucket of table '{table_id}'"),
                "bucket record has no id",
            )
        })?;
        let mut fields = filter_keys(record, BUCKET_KEYS);
        fields.remove("id");

        Ok(NormalizedBucket {
            id,
            fields,
            origin: ResourceOrigin {
                uri: string_field(record, "uri"),
                branch_id: branch_marker(record),
            },
        })
    }

    fn normalize_table(
        record: &Map<String, Value>,
        id: String,
        bucket: NormalizedBucket,
    ) -> NormalizedTable {
        let mut fields = filter_keys(record, TABLE_KEYS);
        for key in TABLE_STRUCTURED_KEYS {
            fields.remove(*key);
        }

        NormalizedTable {
            id,
            bucket,
            primary_key: record.get("primaryKey").and_then(primary_key),
            columns: record.get("columns").map(column_ids).unwrap_or_default(),
            column_metadata: record.get("columnMetadata").filter(|v| !v.is_null()).cloned(),
            fields,
            origin: ResourceOrigin {
                uri: string_field(record, "uri"),
                branch_id: None,
            },
        }
    }
}

impl Default for StorageNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer for StorageNormalizer {
    type Document = StorageDocument;
    type Output = StorageStructure;

    fn normalize(&self, document: &StorageDocument) -> Result<StorageStructure> {
        let default_branch = if self.default_branch_only {
            document.default_branch_id()
        } else {
            None
        };

        let mut structure = StorageStructure {
            project_id: document.project_id(),
            ..StorageStructure::default()
        };
        let mut skipped = 0usize;

        for (index, raw) in document.tables().iter().enumerate() {
            let record = raw.as_object().ok_or_else(|| {
                StructureDiffError::unexpected_shape(
                    format!("normalizing table #{index}"),
                    "table record is not an object",
                )
            })?;
            let table_id = record.get("id").and_then(value_to_id).ok_or_else(|| {
                StructureDiffError::unexpected_shape(
                    format!("normalizing table #{index}"),
                    "table record has no id",
                )
            })?;
            let bucket_record = record
                .get("bucket")
                .and_then(Value::as_object)
                .ok_or_else(|| {
                    StructureDiffError::unexpected_shape(
                        format!("normalizing table '{table_id}'"),
                        "table record does not embed its bucket",
                    )
                })?;

            let bucket = Self::normalize_bucket(bucket_record, &table_id)?;
            if let (Some(default), Some(created_on)) = (&default_branch, &bucket.origin.branch_id) {
                if created_on != default {
                    tracing::debug!(
                        "Skipping table '{}': bucket '{}' was created on branch {}",
                        table_id,
                        bucket.id,
                        created_on
                    );
                    skipped += 1;
                    continue;
                }
            }

            if !structure.buckets.contains_key(&bucket.id) {
                structure.buckets.insert(bucket.id.clone(), bucket.clone());
            }
            if structure.tables.contains_key(&table_id) {
                tracing::warn!("Duplicate table record '{}', keeping the first", table_id);
                continue;
            }
            let table = Self::normalize_table(record, table_id.clone(), bucket);
            structure.tables.insert(table_id, table);
        }

        structure.sort();
        tracing::debug!(
            "Normalized {} bucket(s), {} table(s), skipped {} on non-default branches",
            structure.buckets.len(),
            structure.tables.len(),
            skipped
        );
        Ok(structure)
    }

    fn name(&self) -> &'static str {
        "StorageNormalizer"
    }
}

/// Value of the branch marker in a bucket's metadata list, if present.
fn branch_marker(bucket: &Map<String, Value>) -> Option<String> {
    bucket
        .get("metadata")?
        .as_array()?
        .iter()
        .filter_map(Value::as_object)
        .find(|entry| entry.get("key").and_then(Value::as_str) == Some(BRANCH_METADATA_KEY))
        .and_then(|entry| entry.get("value"))
        .and_then(value_to_id)
}

fn string_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_string)
}

/// `null` means "no primary key"; an empty list is kept as declared.
fn primary_key(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(value_to_id).collect()),
        Value::String(s) if !s.is_empty() => Some(vec![s.clone()]),
        _ => None,
    }
}

/// Column identities: plain names, or the id/name of column objects.
fn column_ids(value: &Value) -> BTreeSet<String> {
    let Some(items) = value.as_array() else {
        return BTreeSet::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(column) => COLUMN_ID_KEYS
                .iter()
                .find_map(|key| column.get(*key).and_then(value_to_id)),
            other => value_to_id(other),
        })
        .collect()
}
