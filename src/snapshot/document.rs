//! Raw snapshot document shapes as produced by the structure pull step.

use serde::Deserialize;
use serde_json::Value;

/// A storage structure snapshot.
///
/// Older pulls write a bare array of table records; newer pulls wrap the
/// tables together with the project id and its development branches.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StorageDocument {
    // Arrays must be tried first: a derived struct also accepts sequences.
    Tables(Vec<Value>),
    Project(ProjectStorage),
}

/// The wrapped storage snapshot shape.
///
/// `tables` is required so that an arbitrary object is not mistaken for an
/// empty project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectStorage {
    #[serde(default)]
    pub project_id: Option<Value>,
    #[serde(rename = "dev-branches", default)]
    pub dev_branches: Vec<DevBranch>,
    pub tables: Vec<Value>,
}

/// One development branch of a project.
#[derive(Debug, Clone, Deserialize)]
pub struct DevBranch {
    pub id: Value,
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
}

impl StorageDocument {
    /// The table records of the snapshot.
    #[must_use]
    pub fn tables(&self) -> &[Value] {
        match self {
            Self::Project(p) => &p.tables,
            Self::Tables(t) => t,
        }
    }

    /// Project id as a string, if the snapshot declares one.
    #[must_use]
    pub fn project_id(&self) -> Option<String> {
        match self {
            Self::Project(p) => p.project_id.as_ref().and_then(value_to_id),
            Self::Tables(_) => None,
        }
    }

    /// Id of the default branch, if the snapshot lists branches.
    #[must_use]
    pub fn default_branch_id(&self) -> Option<String> {
        match self {
            Self::Project(p) => p
                .dev_branches
                .iter()
                .find(|b| b.is_default)
                .and_then(|b| value_to_id(&b.id)),
            Self::Tables(_) => None,
        }
    }
}

/// A flat key snapshot: a JSON array of names.
pub type KeyDocument = Vec<String>;

/// Render an identifier that may be serialized as a string or a number.
#[must_use]
pub fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
