//! Storage change events.
//!
//! Events are the contract between the diff engine and the report renderer:
//! they are serialized to the intermediate `*_vs_*.json` artifact and read
//! back before rendering, so every field a renderer needs is embedded here.

use crate::model::{NormalizedBucket, NormalizedTable};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One detected difference between a source and a destination structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeEvent {
    AddBucket {
        bucket: NormalizedBucket,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
    DropBucket {
        bucket: NormalizedBucket,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
    /// A bucket whose structural fields differ; `bucket` is the source side.
    ModifyBucket {
        bucket: NormalizedBucket,
        previous: NormalizedBucket,
        changed_fields: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
    /// Sharing of a bucket changed (or a new bucket is shared).
    ShareBucket {
        bucket: NormalizedBucket,
        #[serde(default)]
        previous_sharing: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
    AddTable {
        table: NormalizedTable,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
    DropTable {
        table: NormalizedTable,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
    AddColumn {
        table_id: String,
        column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
    DropColumn {
        table_id: String,
        column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
    AddPrimaryKey {
        table_id: String,
        primary_key: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
    DropPrimaryKey {
        table_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
    EditColumnsMetadata {
        table_id: String,
        source_metadata: Option<Value>,
        destination_metadata: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
    /// Any event tag this build does not know about.
    #[serde(other)]
    Unrecognized,
}

impl ChangeEvent {
    /// The serialized tag of this event.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AddBucket { .. } => "ADD_BUCKET",
            Self::DropBucket { .. } => "DROP_BUCKET",
            Self::ModifyBucket { .. } => "MODIFY_BUCKET",
            Self::ShareBucket { .. } => "SHARE_BUCKET",
            Self::AddTable { .. } => "ADD_TABLE",
            Self::DropTable { .. } => "DROP_TABLE",
            Self::AddColumn { .. } => "ADD_COLUMN",
            Self::DropColumn { .. } => "DROP_COLUMN",
            Self::AddPrimaryKey { .. } => "ADD_PRIMARY_KEY",
            Self::DropPrimaryKey { .. } => "DROP_PRIMARY_KEY",
            Self::EditColumnsMetadata { .. } => "EDIT_COLUMNS_METADATA",
            Self::Unrecognized => "UNRECOGNIZED",
        }
    }

    /// Id of the affected bucket, table or table-owning-the-column.
    #[must_use]
    pub fn resource_id(&self) -> Option<&str> {
        match self {
            Self::AddBucket { bucket, .. }
            | Self::DropBucket { bucket, .. }
            | Self::ModifyBucket { bucket, .. }
            | Self::ShareBucket { bucket, .. } => Some(&bucket.id),
            Self::AddTable { table, .. } | Self::DropTable { table, .. } => Some(&table.id),
            Self::AddColumn { table_id, .. }
            | Self::DropColumn { table_id, .. }
            | Self::AddPrimaryKey { table_id, .. }
            | Self::DropPrimaryKey { table_id, .. }
            | Self::EditColumnsMetadata { table_id, .. } => Some(table_id),
            Self::Unrecognized => None,
        }
    }

    /// The derived browsable link, if one could be built.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        match self {
            Self::AddBucket { link, .. }
            | Self::DropBucket { link, .. }
            | Self::ModifyBucket { link, .. }
            | Self::ShareBucket { link, .. }
            | Self::AddTable { link, .. }
            | Self::DropTable { link, .. }
            | Self::AddColumn { link, .. }
            | Self::DropColumn { link, .. }
            | Self::AddPrimaryKey { link, .. }
            | Self::DropPrimaryKey { link, .. }
            | Self::EditColumnsMetadata { link, .. } => link.as_deref(),
            Self::Unrecognized => None,
        }
    }

    /// Whether this is an addition (`ADD_*`).
    #[must_use]
    pub const fn is_addition(&self) -> bool {
        matches!(
            self,
            Self::AddBucket { .. }
                | Self::AddTable { .. }
                | Self::AddColumn { .. }
                | Self::AddPrimaryKey { .. }
        )
    }

    /// Whether this is a removal (`DROP_*`).
    #[must_use]
    pub const fn is_removal(&self) -> bool {
        matches!(
            self,
            Self::DropBucket { .. }
                | Self::DropTable { .. }
                | Self::DropColumn { .. }
                | Self::DropPrimaryKey { .. }
        )
    }
}
