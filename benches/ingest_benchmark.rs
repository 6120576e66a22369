use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ota_agent::manifest::{ingest_str, parse_files, ParseLimits, ParseOptions, UrlAlignment};
use serde_json::{json, Map, Value};
use std::hint::black_box;

/// Build an update action declaring `count` files, each with two hashes
fn create_action(count: usize) -> Value {
    let mut files = Map::new();
    let mut urls = Map::new();

    for i in 0..count {
        let id = format!("{i:08x}");
        files.insert(
            id.clone(),
            json!({
                "fileName": format!("component-{i}.swu"),
                "sizeInBytes": 1024 * (i as u64 + 1),
                "hashes": {
                    "sha256": "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=",
                    "sha1": "2jmj7l5rSw0yVb/vlWAYkK/YBwk=",
                }
            }),
        );
        urls.insert(id.clone(), json!(format!("https://cdn.example/updates/{id}")));
    }

    let manifest = json!({
        "updateId": { "provider": "Contoso", "name": "Gateway", "version": "4.2.1" },
        "files": Value::Object(files),
    });

    json!({ "updateManifest": manifest.to_string(), "fileUrls": Value::Object(urls) })
}

fn bench_options() -> ParseOptions {
    ParseOptions {
        limits: ParseLimits {
            max_document_bytes: 64 * 1024 * 1024,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Benchmark full ingestion from text for growing file counts
fn bench_ingest(c: &mut Criterion) {
    let options = bench_options();
    let mut group = c.benchmark_group("ingest");

    for count in [1usize, 16, 256, 2048].iter() {
        let text = create_action(*count).to_string();
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("positional", count), count, |b, _| {
            b.iter(|| {
                let update = ingest_str(black_box(&text), &options).unwrap();
                black_box(update);
            });
        });

        let strict = ParseOptions {
            url_alignment: UrlAlignment::Strict,
            ..bench_options()
        };
        group.bench_with_input(BenchmarkId::new("strict", count), count, |b, _| {
            b.iter(|| {
                let update = ingest_str(black_box(&text), &strict).unwrap();
                black_box(update);
            });
        });
    }

    group.finish();
}

/// Benchmark a rejection late in the file list, where built entities are discarded
fn bench_late_rejection(c: &mut Criterion) {
    let options = bench_options();
    let mut group = c.benchmark_group("late_rejection");

    for count in [16usize, 256].iter() {
        let mut action = create_action(*count);
        let mut manifest: Value =
            serde_json::from_str(action["updateManifest"].as_str().unwrap()).unwrap();
        let last = manifest["files"].as_object_mut().unwrap().values_mut().last().unwrap();
        last["hashes"] = json!({});
        action["updateManifest"] = json!(manifest.to_string());

        group.bench_with_input(BenchmarkId::new("no_hashes", count), count, |b, _| {
            b.iter(|| {
                let err = parse_files(black_box(&action), &options).unwrap_err();
                black_box(err);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ingest, bench_late_rejection);
criterion_main!(benches);
