//! Storage change-event section renderer.

use super::table::TextTable;
use super::SectionRenderer;
use crate::diff::ChangeEvent;
use serde_json::Value;

/// Line rendered in place of an empty event table.
pub const STORAGE_UNCHANGED: &str = "Storage structure is the same - No changes detected";

/// Renders one row per [`ChangeEvent`]: resource (link or id), label, detail.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageSectionRenderer;

impl StorageSectionRenderer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn row(event: &ChangeEvent) -> [String; 3] {
        let resource = event
            .link()
            .or_else(|| event.resource_id())
            .unwrap_or("-")
            .to_string();

        let (label, detail) = match event {
            ChangeEvent::AddBucket { .. } => ("Bucket added", String::new()),
            ChangeEvent::DropBucket { .. } => ("Bucket removed", String::new()),
            ChangeEvent::ModifyBucket { changed_fields, .. } => {
                ("Bucket modified", changed_fields.join(", "))
            }
            ChangeEvent::ShareBucket {
                bucket,
                previous_sharing,
                ..
            } => match bucket.sharing() {
                Some(sharing) => ("Bucket shared", compact(sharing)),
                None => (
                    "Bucket unshared",
                    previous_sharing.as_ref().map(compact).unwrap_or_default(),
                ),
            },
            ChangeEvent::AddTable { table, .. } => {
                ("Table added", format!("{} columns", table.columns.len()))
            }
            ChangeEvent::DropTable { .. } => ("Table removed", String::new()),
            ChangeEvent::AddColumn { column, .. } => ("Column added", column.clone()),
            ChangeEvent::DropColumn { column, .. } => ("Column removed", column.clone()),
            ChangeEvent::AddPrimaryKey { primary_key, .. } => {
                ("Primary key added", primary_key.join(", "))
            }
            ChangeEvent::DropPrimaryKey { .. } => ("Primary key removed", String::new()),
            ChangeEvent::EditColumnsMetadata { .. } => ("Column metadata changed", String::new()),
            ChangeEvent::Unrecognized => ("Unrecognized change", String::new()),
        };

        [resource, label.to_string(), detail]
    }
}

impl SectionRenderer for StorageSectionRenderer {
    type Diff = [ChangeEvent];

    fn render(&self, events: &[ChangeEvent]) -> String {
        if events.is_empty() {
            return format!("{STORAGE_UNCHANGED}\n");
        }
        let mut table = TextTable::new();
        for event in events {
            table.push_row(Self::row(event));
        }
        table.render()
    }
}

/// Strings render bare, anything else as compact JSON.
fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
