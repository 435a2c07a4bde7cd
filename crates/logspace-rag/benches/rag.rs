//! Benchmarks for RAG operations
//! Run: cargo bench -p logspace-rag --bench rag

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use logspace_core::RetrievedEvidence;
use logspace_rag::{summarize, VectorIndex};
use std::hint::black_box;

// Note: no embedding model is loaded here; vectors are synthetic, sized like AllMiniLML6V2
const DIM: usize = 384;

fn synthetic_vectors(count: usize) -> Vec<Vec<f32>> {
    (0..count)
        .map(|i| {
            (0..DIM)
                .map(|d| ((i * 31 + d * 7) % 97) as f32 / 97.0 - 0.5)
                .collect()
        })
        .collect()
}

fn bench_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_index");
    let query: Vec<f32> = (0..DIM).map(|d| (d % 13) as f32 / 13.0).collect();

    for size in [10, 100, 1_000, 5_000] {
        let vectors = synthetic_vectors(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("build", size), &vectors, |b, vectors| {
            b.iter(|| VectorIndex::build(black_box(vectors)))
        });

        let index = VectorIndex::build(&vectors).unwrap();
        group.bench_with_input(BenchmarkId::new("search_top5", size), &index, |b, index| {
            b.iter(|| index.search(black_box(&query), 5))
        });
    }

    group.finish();
}

fn bench_summary(c: &mut Criterion) {
    let evidence: Vec<RetrievedEvidence> = (0..5)
        .map(|i| {
            RetrievedEvidence::new(
                1.0 - i as f32 * 0.1,
                "2024-01-01 - ERROR - Component=DBHandler - Code: E_DB_FAIL\n".repeat(20),
            )
        })
        .collect();

    c.bench_function("summarize_top5", |b| {
        b.iter(|| summarize(black_box("Unigy 4.0.1"), black_box(&evidence)))
    });
}

criterion_group!(benches, bench_index, bench_summary);
criterion_main!(benches);
