//! Cursor throughput benchmarks.
//!
//! Measures full event consumption over generated JSON documents, against
//! serde_json building its DOM on the same input. Not apples-to-apples -
//! the cursor yields events without building a tree - so the tree path is
//! benchmarked separately via `materialize`.
//!
//! Run with: cargo bench --bench parse

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use riffle_core::{json_cursor, materialize, StreamCursor, Value};

/// Flat array of small objects, the common API-payload shape.
fn generate_records(count: usize) -> String {
    let mut doc = String::from("[");
    for i in 0..count {
        if i > 0 {
            doc.push(',');
        }
        doc.push_str(&format!(
            r#"{{"id":{i},"name":"item-{i}","score":{}.5,"active":{}}}"#,
            i % 100,
            i % 2 == 0
        ));
    }
    doc.push(']');
    doc
}

/// Nested document exercising the container bookkeeping.
fn generate_nested(depth: usize) -> String {
    let mut doc = String::new();
    for i in 0..depth {
        doc.push_str(&format!(r#"{{"level":{i},"child":"#));
    }
    doc.push_str("null");
    for _ in 0..depth {
        doc.push('}');
    }
    doc
}

fn count_events(input: &str) -> usize {
    let mut cursor = json_cursor(input);
    let mut events = 0;
    while !cursor.done() {
        black_box(cursor.current());
        events += 1;
        if cursor.advance().is_err() {
            break;
        }
    }
    events
}

fn bench_event_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_stream");
    for count in [100, 1_000, 10_000] {
        let doc = generate_records(count);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::new("cursor", count), &doc, |b, doc| {
            b.iter(|| count_events(doc));
        });
        group.bench_with_input(BenchmarkId::new("serde_json_dom", count), &doc, |b, doc| {
            b.iter(|| {
                let value: serde_json::Value = serde_json::from_str(doc).expect("valid input");
                black_box(value);
            });
        });
    }
    group.finish();
}

fn bench_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize");
    for count in [100, 1_000] {
        let doc = generate_records(count);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::new("tree", count), &doc, |b, doc| {
            b.iter(|| {
                let mut cursor = json_cursor(doc);
                let value: Value = materialize(&mut cursor).expect("valid input");
                black_box(value);
            });
        });
    }
    group.finish();
}

fn bench_nesting(c: &mut Criterion) {
    let mut group = c.benchmark_group("nesting");
    for depth in [16, 64, 256] {
        let doc = generate_nested(depth);
        group.bench_with_input(BenchmarkId::new("events", depth), &doc, |b, doc| {
            b.iter(|| count_events(doc));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_event_stream, bench_materialize, bench_nesting);
criterion_main!(benches);
