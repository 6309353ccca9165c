//! Criterion benchmarks for the cascade hot path.
//!
//! Each benchmark streams a random-walk price series through a preset
//! and queries the current value after every push — the same pattern
//! the fanout adapter drives.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smoothlab_core::filter::WindowedCascade;

fn random_walk(n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut price = 100.0;
    (0..n)
        .map(|_| {
            price += rng.gen_range(-1.0..1.0);
            price
        })
        .collect()
}

fn stream_through(mut cascade: WindowedCascade, values: &[f64]) -> f64 {
    let mut last = 0.0;
    for &v in values {
        cascade.push(v);
        if let Some(out) = cascade.current() {
            last = out;
        }
    }
    last
}

fn bench_presets(c: &mut Criterion) {
    let values = random_walk(5_000);
    let mut group = c.benchmark_group("cascade_stream");

    group.bench_function("derivative", |b| {
        b.iter(|| stream_through(WindowedCascade::derivative(), black_box(&values)))
    });

    for flen in [10usize, 20, 50] {
        group.bench_with_input(BenchmarkId::new("ema", flen), &flen, |b, &flen| {
            b.iter(|| {
                stream_through(
                    WindowedCascade::ema(flen, 0.3).unwrap(),
                    black_box(&values),
                )
            })
        });
        group.bench_with_input(BenchmarkId::new("trix", flen), &flen, |b, &flen| {
            b.iter(|| {
                stream_through(
                    WindowedCascade::trix(flen, [0.3, 0.3, 0.3]).unwrap(),
                    black_box(&values),
                )
            })
        });
        group.bench_with_input(BenchmarkId::new("hull", flen), &flen, |b, &flen| {
            b.iter(|| {
                stream_through(
                    WindowedCascade::hull(flen, [0.3, 0.3, 0.3]).unwrap(),
                    black_box(&values),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_presets);
criterion_main!(benches);
