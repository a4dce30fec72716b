//! Integration tests for the comparators.
//!
//! These tests drive normalizer → diff engine → renderer through the public
//! API with in-memory snapshot documents.

use serde_json::{json, Value};
use structure_diff::diff::KeyPresence;
use structure_diff::normalize::{KeyNormalizer, Normalizer, StorageNormalizer};
use structure_diff::reports::{
    KeyPresenceRenderer, SectionRenderer, StorageSectionRenderer, STORAGE_UNCHANGED,
    VAULT_UNCHANGED,
};
use structure_diff::snapshot::StorageDocument;
use structure_diff::{ChangeEvent, KeyDiffEngine, LinkProject, StorageDiffEngine};

// ============================================================================
// Helpers
// ============================================================================

const API: &str = "https://connection.keboola.com/v2/storage";

fn bucket(id: &str, extra: Value) -> Value {
    let mut bucket = json!({
        "id": id,
        "name": id,
        "stage": "in",
        "backend": "snowflake",
        "uri": format!("{API}/buckets/{id}"),
        "created": "2024-01-01T00:00:00+0000",
    });
    if let (Some(target), Value::Object(fields)) = (bucket.as_object_mut(), extra) {
        target.extend(fields);
    }
    bucket
}

fn table(id: &str, bucket: Value, columns: &[&str], primary_key: &[&str]) -> Value {
    json!({
        "id": id,
        "name": id.rsplit('.').next().unwrap(),
        "uri": format!("{API}/tables/{id}"),
        "columns": columns,
        "primaryKey": primary_key,
        "rowsCount": 10,
        "bucket": bucket,
    })
}

fn project(project_id: u64, tables: Vec<Value>) -> StorageDocument {
    serde_json::from_value(json!({
        "project_id": project_id,
        "dev-branches": [{"id": 1, "isDefault": true}],
        "tables": tables,
    }))
    .expect("valid storage document")
}

fn compare(source: &StorageDocument, destination: &StorageDocument) -> Vec<ChangeEvent> {
    let normalizer = StorageNormalizer::new();
    StorageDiffEngine::new().compare(
        &normalizer.normalize(source).expect("normalize source"),
        &normalizer.normalize(destination).expect("normalize destination"),
    )
}

fn kinds(events: &[ChangeEvent]) -> Vec<(&'static str, String)> {
    events
        .iter()
        .map(|e| (e.kind(), e.resource_id().unwrap_or_default().to_string()))
        .collect()
}

fn sample() -> StorageDocument {
    project(
        1,
        vec![
            table(
                "in.c-main.users",
                bucket("in.c-main", json!({})),
                &["id", "name"],
                &["id"],
            ),
            table(
                "in.c-main.orders",
                bucket("in.c-main", json!({})),
                &["id", "total"],
                &[],
            ),
        ],
    )
}

// ============================================================================
// Storage comparator
// ============================================================================

mod storage {
    use super::*;

    #[test]
    fn identical_snapshots_produce_no_events() {
        let events = compare(&sample(), &sample());
        assert!(events.is_empty(), "{events:?}");
        assert_eq!(
            StorageSectionRenderer::new().render(&events),
            format!("{STORAGE_UNCHANGED}\n")
        );
    }

    #[test]
    fn volatile_fields_do_not_produce_events() {
        let mut noisy = sample();
        if let StorageDocument::Project(p) = &mut noisy {
            for t in &mut p.tables {
                t["rowsCount"] = json!(99_999);
                t["lastImportDate"] = json!("2025-01-01");
                t["bucket"]["created"] = json!("2030-01-01");
            }
        }
        assert!(compare(&sample(), &noisy).is_empty());
    }

    #[test]
    fn source_only_resources_are_added_exactly_once() {
        let destination = project(2, vec![]);
        let events = compare(&sample(), &destination);

        assert_eq!(
            kinds(&events),
            vec![
                ("ADD_BUCKET", "in.c-main".to_string()),
                ("ADD_TABLE", "in.c-main.orders".to_string()),
                ("ADD_TABLE", "in.c-main.users".to_string()),
            ]
        );
        assert!(!events.iter().any(ChangeEvent::is_removal));
    }

    #[test]
    fn destination_only_resources_are_dropped_exactly_once() {
        let source = project(1, vec![]);
        let events = compare(&source, &sample());

        assert_eq!(
            kinds(&events),
            vec![
                ("DROP_BUCKET", "in.c-main".to_string()),
                ("DROP_TABLE", "in.c-main.orders".to_string()),
                ("DROP_TABLE", "in.c-main.users".to_string()),
            ]
        );
        assert!(!events.iter().any(ChangeEvent::is_addition));
    }

    #[test]
    fn new_shared_bucket_emits_add_then_share() {
        let source = project(
            1,
            vec![table(
                "in.c-b1.t",
                bucket("in.c-b1", json!({"sharing": true, "name": "x"})),
                &["id"],
                &[],
            )],
        );
        let events = compare(&source, &project(2, vec![]));

        assert_eq!(events[0].kind(), "ADD_BUCKET");
        assert_eq!(events[1].kind(), "SHARE_BUCKET");
        assert_eq!(events[0].resource_id(), Some("in.c-b1"));
        assert_eq!(events[1].resource_id(), Some("in.c-b1"));

        let serialized = serde_json::to_value(&events[..2]).unwrap();
        assert_eq!(serialized[0]["event"], "ADD_BUCKET");
        assert_eq!(serialized[0]["bucket"]["id"], "in.c-b1");
        assert_eq!(serialized[1]["event"], "SHARE_BUCKET");
        assert_eq!(serialized[1]["bucket"]["id"], "in.c-b1");
    }

    #[test]
    fn sharing_transition_is_share_not_modify() {
        let unshared = project(
            1,
            vec![table(
                "in.c-main.t",
                bucket("in.c-main", json!({"sharing": null})),
                &["id"],
                &[],
            )],
        );
        let shared = project(
            1,
            vec![table(
                "in.c-main.t",
                bucket("in.c-main", json!({"sharing": "organization"})),
                &["id"],
                &[],
            )],
        );

        let events = compare(&shared, &unshared);
        assert_eq!(
            kinds(&events),
            vec![("SHARE_BUCKET", "in.c-main".to_string())]
        );
    }

    #[test]
    fn modified_bucket_lists_changed_fields() {
        let source = project(
            1,
            vec![table(
                "in.c-main.t",
                bucket("in.c-main", json!({"description": "new", "backend": "bigquery"})),
                &["id"],
                &[],
            )],
        );
        let destination = project(
            1,
            vec![table(
                "in.c-main.t",
                bucket("in.c-main", json!({"description": "old"})),
                &["id"],
                &[],
            )],
        );

        let events = compare(&source, &destination);
        match events.as_slice() {
            [ChangeEvent::ModifyBucket { changed_fields, .. }] => {
                assert_eq!(changed_fields, &["backend", "description"]);
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn primary_key_presence_transitions() {
        let with_key = |key: &[&str]| {
            project(
                1,
                vec![table(
                    "in.c-main.t",
                    bucket("in.c-main", json!({})),
                    &["a", "b"],
                    key,
                )],
            )
        };

        let added = compare(&with_key(&["a"]), &with_key(&[]));
        assert_eq!(kinds(&added), vec![("ADD_PRIMARY_KEY", "in.c-main.t".to_string())]);

        let dropped = compare(&with_key(&[]), &with_key(&["a"]));
        assert_eq!(kinds(&dropped), vec![("DROP_PRIMARY_KEY", "in.c-main.t".to_string())]);

        let changed = compare(&with_key(&["a"]), &with_key(&["b"]));
        assert!(changed.is_empty(), "{changed:?}");
    }

    #[test]
    fn column_metadata_is_compared_as_a_whole() {
        let with_meta = |meta: Value| {
            let mut t = table("in.c-main.t", bucket("in.c-main", json!({})), &["a"], &[]);
            t["columnMetadata"] = meta;
            project(1, vec![t])
        };

        let events = compare(
            &with_meta(json!({"a": [{"key": "KBC.datatype.basetype", "value": "STRING"}]})),
            &with_meta(json!({"a": [{"key": "KBC.datatype.basetype", "value": "INTEGER"}]})),
        );
        assert_eq!(
            kinds(&events),
            vec![("EDIT_COLUMNS_METADATA", "in.c-main.t".to_string())]
        );
    }

    #[test]
    fn links_use_the_configured_project() {
        let source = project(111, vec![]);
        let destination = sample();
        let normalizer = StorageNormalizer::new();
        let src = normalizer.normalize(&source).unwrap();
        let dst = normalizer.normalize(&destination).unwrap();

        let by_source = StorageDiffEngine::new().compare(&src, &dst);
        assert_eq!(
            by_source[0].link(),
            Some("https://connection.keboola.com/admin/projects/111/storage/in.c-main")
        );

        let by_owner = StorageDiffEngine::new()
            .link_project(LinkProject::Owner)
            .compare(&src, &dst);
        assert_eq!(
            by_owner[0].link(),
            Some("https://connection.keboola.com/admin/projects/1/storage/in.c-main")
        );
        assert_eq!(
            by_owner[1].link(),
            Some("https://connection.keboola.com/admin/projects/1/storage/in.c-main/orders")
        );
    }

    #[test]
    fn compare_is_idempotent() {
        let destination = project(
            2,
            vec![table(
                "out.c-x.y",
                bucket("out.c-x", json!({})),
                &["id"],
                &[],
            )],
        );
        let first = serde_json::to_string(&compare(&sample(), &destination)).unwrap();
        let second = serde_json::to_string(&compare(&sample(), &destination)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn document_order_does_not_affect_output() {
        let reversed = match sample() {
            StorageDocument::Project(mut p) => {
                p.tables.reverse();
                StorageDocument::Project(p)
            }
            other => other,
        };
        let destination = project(2, vec![]);
        assert_eq!(
            serde_json::to_string(&compare(&sample(), &destination)).unwrap(),
            serde_json::to_string(&compare(&reversed, &destination)).unwrap()
        );
    }

    #[test]
    fn artifact_round_trip_renders_identically() {
        let events = compare(&sample(), &project(2, vec![]));
        let json = serde_json::to_string_pretty(&events).unwrap();
        let restored: Vec<ChangeEvent> = serde_json::from_str(&json).unwrap();

        let renderer = StorageSectionRenderer::new();
        assert_eq!(renderer.render(&events), renderer.render(&restored));
    }

    #[test]
    fn unknown_event_renders_generic_row() {
        let restored: Vec<ChangeEvent> =
            serde_json::from_value(json!([{"event": "RENAME_BUCKET", "id": "x"}])).unwrap();
        let text = StorageSectionRenderer::new().render(&restored);
        assert!(text.contains("Unrecognized change"), "{text}");
    }
}

// ============================================================================
// Vault (flat key) comparator
// ============================================================================

mod vault {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn presence_rows_for_each_key() {
        let normalizer = KeyNormalizer::new();
        let diff = KeyDiffEngine::new().compare(
            &normalizer.normalize(&keys(&["A", "B"])).unwrap(),
            &normalizer.normalize(&keys(&["B", "C"])).unwrap(),
        );

        let presence: Vec<(&str, KeyPresence)> = diff
            .entries
            .iter()
            .map(|e| (e.key.as_str(), e.presence))
            .collect();
        assert_eq!(
            presence,
            vec![
                ("A", KeyPresence::SourceOnly),
                ("B", KeyPresence::Both),
                ("C", KeyPresence::DestinationOnly),
            ]
        );

        let text = KeyPresenceRenderer::new("dev", "prod").render(&diff);
        assert_eq!(
            text,
            "KEY  dev  prod\n--------------\nA    ✓    ✗\nB    ✓    ✓\nC    ✗    ✓\n"
        );
    }

    #[test]
    fn identical_key_lists_render_sentinel() {
        let normalizer = KeyNormalizer::new();
        let set = normalizer.normalize(&keys(&["X", "Y", "X"])).unwrap();
        let diff = KeyDiffEngine::new().compare(&set, &set);

        assert!(diff.is_unchanged());
        assert_eq!(
            KeyPresenceRenderer::new("dev", "prod").render(&diff),
            format!("{VAULT_UNCHANGED}\n")
        );
    }
}
