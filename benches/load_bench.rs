//! Performance benchmarks for artifact loading.
//!
//! Measures manifest resolution and shard concatenation as the number of
//! weight files grows.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pesos::artifacts::{WeightGroup, WeightSpec};
use pesos::io::{resolve_manifest_paths, ArtifactLoader, ByteSource, ProvidedFile};
use serde_json::json;

const SHARD_BYTES: usize = 4096;

fn manifest(shards: usize) -> Vec<WeightGroup> {
    let paths = (0..shards)
        .map(|i| format!("./group1-shard{}of{}.bin", i + 1, shards))
        .collect();
    vec![WeightGroup::new(
        paths,
        vec![WeightSpec::new("w", vec![shards * SHARD_BYTES / 4], "float32")],
    )]
}

/// Benchmark resolve_manifest_paths with reversed supply order
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_manifest_paths");

    for shards in [4, 64, 1_024].iter() {
        let manifest = manifest(*shards);
        let names: Vec<String> = (0..*shards)
            .rev()
            .map(|i| format!("group1-shard{}of{}.bin", i + 1, shards))
            .collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();

        group.throughput(Throughput::Elements(*shards as u64));
        group.bench_with_input(BenchmarkId::new("reversed", shards), shards, |b, _| {
            b.iter(|| black_box(resolve_manifest_paths(&manifest, &names).unwrap()));
        });
    }
    group.finish();
}

/// Benchmark a full in-memory load
fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("ArtifactLoader");
    let rt = tokio::runtime::Runtime::new().unwrap();

    for shards in [4, 64, 256].iter() {
        let json = json!({"modelTopology": {}, "weightsManifest": manifest(*shards)}).to_string();

        group.throughput(Throughput::Bytes((*shards * SHARD_BYTES) as u64));
        group.bench_with_input(BenchmarkId::new("load", shards), shards, |b, &shards| {
            b.to_async(&rt).iter(|| {
                let json = json.clone();
                async move {
                    let mut files: Vec<Box<dyn ByteSource>> =
                        vec![Box::new(ProvidedFile::new("model.json", json))];
                    files.extend((0..shards).map(|i| {
                        Box::new(ProvidedFile::new(
                            format!("group1-shard{}of{}.bin", i + 1, shards),
                            vec![i as u8; SHARD_BYTES],
                        )) as Box<dyn ByteSource>
                    }));
                    let loader = ArtifactLoader::new(files).unwrap();
                    black_box(loader.load().await.unwrap())
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_load);
criterion_main!(benches);
