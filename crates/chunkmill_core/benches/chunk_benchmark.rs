//! # Chunk Benchmark
//!
//! REQUIREMENTS:
//! - 65,536 blocks and 1,000 entities per chunk
//! - Recycle must cost no more than a fresh seed (no allocation)
//!
//! Run with: `cargo bench --package chunkmill_core`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chunkmill_core::{AtomicIdentity, Chunk, ChunkCapacity, Vec3};
use chunkmill_shared::{CHUNK_COUNT, N_BLOCKS, N_ENTITIES};

fn capacity() -> ChunkCapacity {
    ChunkCapacity::new(N_BLOCKS, N_ENTITIES).expect("default capacity is valid")
}

/// Benchmark: allocate and seed a chunk (the only allocating path).
fn bench_chunk_construction(c: &mut Criterion) {
    c.bench_function("chunk_new_65536b_1000e", |b| {
        b.iter(|| black_box(Chunk::new(Vec3::ZERO, capacity())));
    });
}

/// Benchmark: in-range update (entity pass only).
fn bench_chunk_update(c: &mut Criterion) {
    let ids = AtomicIdentity::new();
    let mut chunk = Chunk::new(Vec3::ZERO, capacity());
    #[allow(clippy::cast_precision_loss)]
    let radius = CHUNK_COUNT as f32;

    c.bench_function("chunk_update_in_range", |b| {
        b.iter(|| black_box(chunk.update(Vec3::ZERO, radius, &ids)));
    });
}

/// Benchmark: update that recycles in place every time.
fn bench_chunk_recycle(c: &mut Criterion) {
    let ids = AtomicIdentity::new();
    let mut chunk = Chunk::new(Vec3::ZERO, capacity());
    let far_away = Vec3::new(1.0e9, 0.0, 0.0);
    #[allow(clippy::cast_precision_loss)]
    let radius = CHUNK_COUNT as f32;

    c.bench_function("chunk_update_recycle", |b| {
        b.iter(|| black_box(chunk.update(far_away, radius, &ids)));
    });
}

criterion_group!(
    benches,
    bench_chunk_construction,
    bench_chunk_update,
    bench_chunk_recycle,
);
criterion_main!(benches);
