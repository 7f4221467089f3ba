use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use triedex::Index;

const SEED: u64 = 42;

fn generate_keys(size: usize) -> Vec<(String, u64)> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..size)
        .map(|n| {
            let len = rng.gen_range(3..12);
            let key: String = (0..len)
                .map(|_| (b'a' + rng.gen_range(0..8)) as char)
                .collect();
            (key, n as u64)
        })
        .collect()
}

fn build_index(data: &[(String, u64)]) -> Index {
    let mut index = Index::new();
    for (key, record) in data {
        index.insert(key, *record);
    }
    index
}

fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");
    for size in [1_000, 10_000].iter() {
        let data = generate_keys(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(build_index(&data)))
        });
    }
    group.finish();
}

fn bench_precise_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("precise_search");
    for size in [1_000, 10_000].iter() {
        let data = generate_keys(*size);
        let index = build_index(&data);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                for (key, _) in &data {
                    black_box(index.search(key, true));
                }
            })
        });
    }
    group.finish();
}

fn bench_prefix_search(c: &mut Criterion) {
    let data = generate_keys(10_000);
    let index = build_index(&data);
    c.bench_function("prefix_search", |b| {
        b.iter(|| {
            for prefix in ["a", "ab", "abc", "h", "hg"] {
                black_box(index.search(prefix, false));
            }
        })
    });
}

fn bench_churn(c: &mut Criterion) {
    let data = generate_keys(5_000);
    c.bench_function("insert_delete_churn", |b| {
        b.iter(|| {
            let mut index = build_index(&data);
            for (key, record) in &data {
                index.remove(key, *record);
            }
            black_box(index)
        })
    });
}

criterion_group!(
    benches,
    bench_insertion,
    bench_precise_search,
    bench_prefix_search,
    bench_churn
);
criterion_main!(benches);
