use criterion::{criterion_group, criterion_main, Criterion};
use flaker::{decode, Epoch, GeneratorConfig, Layout, FieldOrder, SnowflakeGenerator};
use std::hint::black_box;
use std::sync::Arc;

pub fn generate_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Generate");

    let generator = SnowflakeGenerator::new(Epoch::EKO, 1, 1).unwrap();
    group.bench_function("canonical", |b| {
        b.iter(|| black_box(generator.generate().unwrap()));
    });

    // Sequence width decides how often a caller waits for the next millisecond
    for &sequence_bits in &[8u8, 12, 16] {
        let layout = Layout::new(sequence_bits, 5, 5, FieldOrder::WorkerHigh).unwrap();
        let config = GeneratorConfig::builder().layout(layout).build().unwrap();
        let generator = SnowflakeGenerator::with_config(config);
        group.bench_function(format!("sequence_bits_{sequence_bits}"), |b| {
            b.iter(|| black_box(generator.generate().unwrap()));
        });
    }

    group.finish();
}

pub fn decode_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Decode");
    let generator = SnowflakeGenerator::new(Epoch::EKO, 1, 1).unwrap();
    let id = generator.generate().unwrap();
    let decoder = generator.decoder();

    group.bench_function("decode", |b| {
        b.iter(|| black_box(decode(black_box(id.as_u64()), Epoch::EKO)));
    });
    group.bench_function("decoder_datetime", |b| {
        b.iter(|| black_box(decoder.datetime(black_box(id))));
    });

    group.finish();
}

pub fn concurrent_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Concurrent");

    for &thread_count in &[2, 4, 8] {
        group.bench_function(format!("threads/{}", thread_count), |b| {
            let generator = Arc::new(SnowflakeGenerator::new(Epoch::EKO, 1, 1).unwrap());
            b.iter(|| {
                let handles: Vec<_> = (0..thread_count)
                    .map(|_| {
                        let generator = Arc::clone(&generator);
                        std::thread::spawn(move || {
                            for _ in 0..100 {
                                black_box(generator.generate().unwrap());
                            }
                        })
                    })
                    .collect();

                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    generate_benchmarks,
    decode_benchmarks,
    concurrent_benchmarks
);
criterion_main!(benches);
