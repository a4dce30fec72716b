//! Normalized storage resources (buckets, tables, columns).

use super::NormalizedMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Bucket fields that describe sharing rather than structure.
///
/// Sharing transitions are reported as their own event, so these fields
/// never contribute to a bucket modification.
pub const SHARING_FIELDS: &[&str] = &["sharing", "sharingParameters"];

/// Where a resource came from, kept outside the compared payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceOrigin {
    /// API URI of the resource, used to derive browsable links
    pub uri: Option<String>,
    /// Branch that created the resource, read from bucket metadata
    pub branch_id: Option<String>,
}

/// A bucket record reduced to its allow-listed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedBucket {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(skip)]
    pub origin: ResourceOrigin,
}

impl NormalizedBucket {
    /// Create a bucket with no fields besides its id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
            origin: ResourceOrigin::default(),
        }
    }

    /// The sharing value, if the bucket is shared at all.
    ///
    /// `null`, `false`, `""` and `0` all count as "not shared".
    #[must_use]
    pub fn sharing(&self) -> Option<&Value> {
        self.fields.get("sharing").filter(|v| is_truthy(v))
    }

    /// Whether the bucket is shared.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.sharing().is_some()
    }

    /// Names of structural fields whose values differ from `other`.
    ///
    /// Sharing fields are excluded. A field missing on one side and present on
    /// the other counts as changed. The result is sorted.
    #[must_use]
    pub fn changed_fields(&self, other: &Self) -> Vec<String> {
        let keys: BTreeSet<&String> = self.fields.keys().chain(other.fields.keys()).collect();
        keys.into_iter()
            .filter(|key| !SHARING_FIELDS.contains(&key.as_str()))
            .filter(|key| self.fields.get(*key) != other.fields.get(*key))
            .cloned()
            .collect()
    }
}

/// A table record reduced to its allow-listed fields.
///
/// `primary_key` and `column_metadata` are `None` when the source record does
/// not carry the key, so presence and absence compare as distinct states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedTable {
    pub id: String,
    pub bucket: NormalizedBucket,
    #[serde(rename = "primaryKey")]
    pub primary_key: Option<Vec<String>>,
    #[serde(default)]
    pub columns: BTreeSet<String>,
    #[serde(rename = "columnMetadata")]
    pub column_metadata: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(skip)]
    pub origin: ResourceOrigin,
}

impl NormalizedTable {
    /// Create an empty table belonging to `bucket`.
    #[must_use]
    pub fn new(id: impl Into<String>, bucket: NormalizedBucket) -> Self {
        Self {
            id: id.into(),
            bucket,
            primary_key: None,
            columns: BTreeSet::new(),
            column_metadata: None,
            fields: Map::new(),
            origin: ResourceOrigin::default(),
        }
    }

    /// Whether the table declares a non-empty primary key.
    #[must_use]
    pub fn has_primary_key(&self) -> bool {
        self.primary_key.as_ref().is_some_and(|pk| !pk.is_empty())
    }

    /// The primary key columns, empty when none are declared.
    #[must_use]
    pub fn primary_key_columns(&self) -> &[String] {
        self.primary_key.as_deref().unwrap_or_default()
    }
}

/// The normalized storage layout of one project snapshot.
#[derive(Debug, Clone, Default)]
pub struct StorageStructure {
    /// Project the snapshot was taken from, when the snapshot declares it
    pub project_id: Option<String>,
    pub buckets: NormalizedMap<NormalizedBucket>,
    pub tables: NormalizedMap<NormalizedTable>,
}

impl StorageStructure {
    /// Sort buckets and tables by id so iteration order never depends on the
    /// order of records in the source document.
    pub fn sort(&mut self) {
        self.buckets.sort_keys();
        self.tables.sort_keys();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty() && self.tables.is_empty()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
