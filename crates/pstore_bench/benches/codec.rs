//! Key and value serialization benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pstore_codec::{from_cbor, to_canonical_cbor};
use pstore_core::codec::{encode_key, encode_value};
use std::collections::HashMap;

/// Benchmark encoding keys of different shapes.
fn bench_encode_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_key");

    group.bench_function("text", |b| {
        b.iter(|| {
            let key = encode_key(black_box("user:1234")).unwrap();
            black_box(key);
        });
    });

    group.bench_function("tuple", |b| {
        let key = ("user", 1234u64, true);
        b.iter(|| {
            let key = encode_key(black_box(&key)).unwrap();
            black_box(key);
        });
    });

    group.finish();
}

/// Benchmark encoding maps, which requires sorting entries.
fn bench_encode_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_map");

    for size in [4, 64, 512] {
        let map: HashMap<String, u64> = (0..size).map(|i| (format!("field_{i}"), i)).collect();
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &map, |b, map| {
            b.iter(|| {
                let bytes = encode_value(black_box(map)).unwrap();
                black_box(bytes);
            });
        });
    }

    group.finish();
}

/// Benchmark decoding values.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [64usize, 4096] {
        let bytes = to_canonical_cbor(&vec![7u8; size]).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("seq", size), &bytes, |b, bytes| {
            b.iter(|| {
                let value: Vec<u8> = from_cbor(black_box(bytes)).unwrap();
                black_box(value);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode_key, bench_encode_map, bench_decode);
criterion_main!(benches);
