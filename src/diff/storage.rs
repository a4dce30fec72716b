//! Hierarchical storage comparator (buckets, tables, columns).

use super::event::ChangeEvent;
use super::link::{LinkBuilder, LinkProject};
use super::traits::{reconcile, ChangeComputer};
use crate::model::{NormalizedBucket, NormalizedTable, StorageStructure};

/// Compares two normalized storage structures.
///
/// Buckets are reconciled first, then tables. Within each pass additions and
/// modifications follow source order and removals follow destination order.
#[derive(Debug, Clone, Default)]
pub struct StorageDiffEngine {
    link_project: LinkProject,
}

impl StorageDiffEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            link_project: LinkProject::Source,
        }
    }

    /// Choose which project id goes into derived links.
    #[must_use]
    pub const fn link_project(mut self, link_project: LinkProject) -> Self {
        self.link_project = link_project;
        self
    }

    /// Compare `source` against `destination`.
    #[must_use]
    pub fn compare(
        &self,
        source: &StorageStructure,
        destination: &StorageStructure,
    ) -> Vec<ChangeEvent> {
        let current = LinkBuilder::new(source.project_id.clone());
        let removed = match self.link_project {
            LinkProject::Source => current.clone(),
            LinkProject::Owner => LinkBuilder::new(destination.project_id.clone()),
        };
        let links = Links { current, removed };

        let mut events = reconcile(
            &BucketChangeComputer { links: &links },
            &source.buckets,
            &destination.buckets,
        );
        events.extend(reconcile(
            &TableChangeComputer { links: &links },
            &source.tables,
            &destination.tables,
        ));
        events
    }
}

/// Link builders for resources that exist in the source and for removals.
struct Links {
    current: LinkBuilder,
    removed: LinkBuilder,
}

struct BucketChangeComputer<'a> {
    links: &'a Links,
}

impl ChangeComputer for BucketChangeComputer<'_> {
    type Resource = NormalizedBucket;
    type Event = ChangeEvent;

    fn added(&self, _id: &str, bucket: &NormalizedBucket, events: &mut Vec<ChangeEvent>) {
        let link = self.links.current.link(bucket.origin.uri.as_deref());
        events.push(ChangeEvent::AddBucket {
            bucket: bucket.clone(),
            link: link.clone(),
        });
        if bucket.is_shared() {
            events.push(ChangeEvent::ShareBucket {
                bucket: bucket.clone(),
                previous_sharing: None,
                link,
            });
        }
    }

    fn removed(&self, _id: &str, bucket: &NormalizedBucket, events: &mut Vec<ChangeEvent>) {
        events.push(ChangeEvent::DropBucket {
            bucket: bucket.clone(),
            link: self.links.removed.link(bucket.origin.uri.as_deref()),
        });
    }

    fn matched(
        &self,
        _id: &str,
        source: &NormalizedBucket,
        destination: &NormalizedBucket,
        events: &mut Vec<ChangeEvent>,
    ) {
        let link = self.links.current.link(source.origin.uri.as_deref());
        if source.sharing() != destination.sharing() {
            events.push(ChangeEvent::ShareBucket {
                bucket: source.clone(),
                previous_sharing: destination.sharing().cloned(),
                link: link.clone(),
            });
        }

        let changed_fields = source.changed_fields(destination);
        if !changed_fields.is_empty() {
            events.push(ChangeEvent::ModifyBucket {
                bucket: source.clone(),
                previous: destination.clone(),
                changed_fields,
                link,
            });
        }
    }

    fn name(&self) -> &'static str {
        "BucketChangeComputer"
    }
}

struct TableChangeComputer<'a> {
    links: &'a Links,
}

impl ChangeComputer for TableChangeComputer<'_> {
    type Resource = NormalizedTable;
    type Event = ChangeEvent;

    fn added(&self, _id: &str, table: &NormalizedTable, events: &mut Vec<ChangeEvent>) {
        events.push(ChangeEvent::AddTable {
            table: table.clone(),
            link: self.links.current.link(table.origin.uri.as_deref()),
        });
    }

    fn removed(&self, _id: &str, table: &NormalizedTable, events: &mut Vec<ChangeEvent>) {
        events.push(ChangeEvent::DropTable {
            table: table.clone(),
            link: self.links.removed.link(table.origin.uri.as_deref()),
        });
    }

    fn matched(
        &self,
        id: &str,
        source: &NormalizedTable,
        destination: &NormalizedTable,
        events: &mut Vec<ChangeEvent>,
    ) {
        let link = self.links.current.link(source.origin.uri.as_deref());

        for column in source.columns.difference(&destination.columns) {
            events.push(ChangeEvent::AddColumn {
                table_id: id.to_string(),
                column: column.clone(),
                link: link.clone(),
            });
        }
        for column in destination.columns.difference(&source.columns) {
            events.push(ChangeEvent::DropColumn {
                table_id: id.to_string(),
                column: column.clone(),
                link: link.clone(),
            });
        }

        // Only presence transitions count; a key that changes between two
        // non-empty column lists is not reported.
        match (source.has_primary_key(), destination.has_primary_key()) {
            (true, false) => events.push(ChangeEvent::AddPrimaryKey {
                table_id: id.to_string(),
                primary_key: source.primary_key_columns().to_vec(),
                link: link.clone(),
            }),
            (false, true) => events.push(ChangeEvent::DropPrimaryKey {
                table_id: id.to_string(),
                link: link.clone(),
            }),
            _ => {}
        }

        if source.column_metadata != destination.column_metadata {
            events.push(ChangeEvent::EditColumnsMetadata {
                table_id: id.to_string(),
                source_metadata: source.column_metadata.clone(),
                destination_metadata: destination.column_metadata.clone(),
                link,
            });
        }
    }

    fn name(&self) -> &'static str {
        "TableChangeComputer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceOrigin;
    use serde_json::{json, Value};

    fn bucket(id: &str, fields: Value) -> NormalizedBucket {
        let mut b = NormalizedBucket::new(id);
        if let Value::Object(map) = fields {
            b.fields = map;
        }
        b.origin = ResourceOrigin {
            uri: Some(format!("https://connection.keboola.com/v2/storage/buckets/{id}")),
            branch_id: None,
        };
        b
    }

    fn table(id: &str, columns: &[&str], pk: Option<&[&str]>) -> NormalizedTable {
        let bucket_id = id.rsplit_once('.').unwrap().0;
        let mut t = NormalizedTable::new(id, bucket(bucket_id, json!({"name": "main"})));
        t.columns = columns.iter().map(|c| (*c).to_string()).collect();
        t.primary_key = pk.map(|cols| cols.iter().map(|c| (*c).to_string()).collect());
        t.origin.uri = Some(format!("https://connection.keboola.com/v2/storage/tables/{id}"));
        t
    }

    fn structure(project: &str, buckets: Vec<NormalizedBucket>, tables: Vec<NormalizedTable>) -> StorageStructure {
        let mut s = StorageStructure {
            project_id: Some(project.to_string()),
            ..StorageStructure::default()
        };
        for b in buckets {
            s.buckets.insert(b.id.clone(), b);
        }
        for t in tables {
            s.tables.insert(t.id.clone(), t);
        }
        s.sort();
        s
    }

    fn kinds(events: &[ChangeEvent]) -> Vec<&'static str> {
        events.iter().map(ChangeEvent::kind).collect()
    }

    #[test]
    fn test_identical_structures_have_no_events() {
        let s = structure(
            "1",
            vec![bucket("in.c-main", json!({"name": "main", "sharing": "organization"}))],
            vec![table("in.c-main.users", &["id", "name"], Some(&["id"]))],
        );
        assert!(StorageDiffEngine::new().compare(&s, &s.clone()).is_empty());
    }

    #[test]
    fn test_added_shared_bucket_emits_add_then_share() {
        let src = structure("1", vec![bucket("b1", json!({"name": "x", "sharing": true}))], vec![]);
        let dst = structure("2", vec![], vec![]);
        let events = StorageDiffEngine::new().compare(&src, &dst);
        assert_eq!(kinds(&events), vec!["ADD_BUCKET", "SHARE_BUCKET"]);
        assert_eq!(events[0].resource_id(), Some("b1"));
        assert_eq!(events[1].resource_id(), Some("b1"));
    }

    #[test]
    fn test_sharing_transition_is_not_a_modification() {
        let src = structure("1", vec![bucket("b1", json!({"name": "x", "sharing": "organization"}))], vec![]);
        let dst = structure("2", vec![bucket("b1", json!({"name": "x", "sharing": null}))], vec![]);
        let events = StorageDiffEngine::new().compare(&src, &dst);
        assert_eq!(kinds(&events), vec!["SHARE_BUCKET"]);
    }

    #[test]
    fn test_bucket_modification_lists_fields() {
        let src = structure("1", vec![bucket("b1", json!({"name": "x", "description": "new"}))], vec![]);
        let dst = structure("2", vec![bucket("b1", json!({"name": "x"}))], vec![]);
        let events = StorageDiffEngine::new().compare(&src, &dst);
        match &events[..] {
            [ChangeEvent::ModifyBucket { changed_fields, .. }] => {
                assert_eq!(changed_fields, &vec!["description".to_string()]);
            }
            other => panic!("Expected one MODIFY_BUCKET, got {other:?}"),
        }
    }

    #[test]
    fn test_bucket_pass_precedes_table_pass() {
        let src = structure(
            "1",
            vec![bucket("in.c-new", json!({}))],
            vec![table("in.c-new.t", &["a"], None)],
        );
        let dst = structure(
            "2",
            vec![bucket("in.c-old", json!({}))],
            vec![table("in.c-old.t", &["a"], None)],
        );
        let events = StorageDiffEngine::new().compare(&src, &dst);
        assert_eq!(
            kinds(&events),
            vec!["ADD_BUCKET", "DROP_BUCKET", "ADD_TABLE", "DROP_TABLE"]
        );
    }

    #[test]
    fn test_column_and_primary_key_changes() {
        let src = structure("1", vec![], vec![table("in.c-main.t", &["a", "c", "d"], Some(&["a"]))]);
        let dst = structure("2", vec![], vec![table("in.c-main.t", &["a", "b"], None)]);
        let events = StorageDiffEngine::new().compare(&src, &dst);
        assert_eq!(
            kinds(&events),
            vec!["ADD_COLUMN", "ADD_COLUMN", "DROP_COLUMN", "ADD_PRIMARY_KEY"]
        );
        match &events[3] {
            ChangeEvent::AddPrimaryKey { primary_key, .. } => assert_eq!(primary_key, &vec!["a".to_string()]),
            other => panic!("Expected ADD_PRIMARY_KEY, got {other:?}"),
        }
    }

    #[test]
    fn test_primary_key_change_between_non_empty_keys_is_silent() {
        let src = structure("1", vec![], vec![table("in.c-main.t", &["a", "b"], Some(&["a"]))]);
        let dst = structure("2", vec![], vec![table("in.c-main.t", &["a", "b"], Some(&["b"]))]);
        assert!(StorageDiffEngine::new().compare(&src, &dst).is_empty());
    }

    #[test]
    fn test_primary_key_drop() {
        let src = structure("1", vec![], vec![table("in.c-main.t", &["a"], Some(&[]))]);
        let dst = structure("2", vec![], vec![table("in.c-main.t", &["a"], Some(&["a"]))]);
        let events = StorageDiffEngine::new().compare(&src, &dst);
        assert_eq!(kinds(&events), vec!["DROP_PRIMARY_KEY"]);
    }

    #[test]
    fn test_column_metadata_is_compared_as_a_whole() {
        let mut a = table("in.c-main.t", &["a"], None);
        a.column_metadata = Some(json!({"a": [{"key": "KBC.datatype.basetype", "value": "STRING"}]}));
        let b = table("in.c-main.t", &["a"], None);
        let events = StorageDiffEngine::new().compare(
            &structure("1", vec![], vec![a]),
            &structure("2", vec![], vec![b]),
        );
        match &events[..] {
            [ChangeEvent::EditColumnsMetadata { source_metadata, destination_metadata, .. }] => {
                assert!(source_metadata.is_some());
                assert!(destination_metadata.is_none());
            }
            other => panic!("Expected one EDIT_COLUMNS_METADATA, got {other:?}"),
        }
    }

    #[test]
    fn test_removed_links_use_source_project_by_default() {
        let src = structure("111", vec![], vec![]);
        let dst = structure("222", vec![bucket("in.c-old", json!({}))], vec![]);

        let events = StorageDiffEngine::new().compare(&src, &dst);
        assert_eq!(
            events[0].link(),
            Some("https://connection.keboola.com/admin/projects/111/storage/in.c-old")
        );

        let events = StorageDiffEngine::new()
            .link_project(LinkProject::Owner)
            .compare(&src, &dst);
        assert_eq!(
            events[0].link(),
            Some("https://connection.keboola.com/admin/projects/222/storage/in.c-old")
        );
    }
}
