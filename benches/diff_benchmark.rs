//! Benchmarks for the storage comparator.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::hint::black_box;
use structure_diff::normalize::{Normalizer, StorageNormalizer};
use structure_diff::snapshot::StorageDocument;
use structure_diff::StorageDiffEngine;

/// A project with `buckets` buckets of `tables` tables each.
///
/// `drift` shifts column names and sharing so source and destination differ
/// on roughly every other table.
fn generate_snapshot(buckets: usize, tables: usize, drift: usize) -> StorageDocument {
    let mut records: Vec<Value> = Vec::with_capacity(buckets * tables);
    for b in 0..buckets {
        let bucket_id = format!("in.c-bucket{b}");
        let sharing = if (b + drift) % 3 == 0 {
            json!("organization")
        } else {
            Value::Null
        };
        let bucket = json!({
            "id": bucket_id,
            "name": format!("c-bucket{b}"),
            "stage": "in",
            "backend": "snowflake",
            "uri": format!("https://connection.keboola.com/v2/storage/buckets/{bucket_id}"),
            "sharing": sharing,
            "created": "2024-01-01T00:00:00+0000",
        });
        for t in 0..tables {
            let id = format!("{bucket_id}.table{t}");
            let columns: Vec<String> = (0..12)
                .map(|c| format!("col{}", c + (t + drift) % 2))
                .collect();
            let primary_key: Vec<&str> = if (t + drift) % 4 == 0 {
                vec!["col1"]
            } else {
                Vec::new()
            };
            records.push(json!({
                "id": id,
                "name": format!("table{t}"),
                "uri": format!("https://connection.keboola.com/v2/storage/tables/{id}"),
                "primaryKey": primary_key,
                "columns": columns,
                "rowsCount": t * 100,
                "bucket": bucket.clone(),
            }));
        }
    }
    StorageDocument::Tables(records)
}

fn benchmark_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage_compare");
    let normalizer = StorageNormalizer::new();
    let engine = StorageDiffEngine::new();

    for size in [10usize, 50, 200] {
        let source = normalizer
            .normalize(&generate_snapshot(size, 20, 0))
            .expect("normalize source");
        let destination = normalizer
            .normalize(&generate_snapshot(size, 20, 1))
            .expect("normalize destination");

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(engine.compare(black_box(&source), black_box(&destination))));
        });
    }
    group.finish();
}

fn benchmark_normalize(c: &mut Criterion) {
    let document = generate_snapshot(50, 20, 0);
    let normalizer = StorageNormalizer::new();

    c.bench_function("storage_normalize_1000_tables", |b| {
        b.iter(|| black_box(normalizer.normalize(black_box(&document))));
    });
}

criterion_group!(benches, benchmark_compare, benchmark_normalize);
criterion_main!(benches);
