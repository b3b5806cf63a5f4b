use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use sha256_lab::cs::security::preimage::{PreimageSearch, SearchConfig};
use sha256_lab::cs::security::sha256::hash;

fn bench_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("sha256_hash");

    for size in [0usize, 55, 64, 1024, 64 * 1024] {
        let data = vec![0xA5u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| hash(black_box(data)))
        });
    }

    group.finish();
}

fn bench_preimage(c: &mut Criterion) {
    let mut group = c.benchmark_group("sha256_preimage");
    group.sample_size(10);

    // Last two-character candidate, so the full length-2 space is searched.
    let target = hash("~~");
    for threads in [1usize, 4] {
        let config = SearchConfig::builder()
            .max_length(2)
            .threads(threads)
            .build()
            .unwrap();
        let search = PreimageSearch::new(config).unwrap();
        group.bench_with_input(BenchmarkId::new("threads", threads), &target, |b, target| {
            b.iter(|| search.find(black_box(target)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hash, bench_preimage);
criterion_main!(benches);
