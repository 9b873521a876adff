//! Criterion benchmarks for multiplication and division around the
//! algorithm crossover points.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use mparith_nat::{Context, Nat, Thresholds};

fn operand(words: usize, seed: u64) -> Nat {
    let mut s = seed | 1;
    Nat::from_words(
        (0..words)
            .map(|_| {
                s ^= s << 13;
                s ^= s >> 7;
                s ^= s << 17;
                s
            })
            .collect(),
    )
}

fn bench_mul(c: &mut Criterion) {
    let ctx = Context::default();
    let schoolbook = Context::with_thresholds(Thresholds {
        karatsuba: usize::MAX,
        ..Thresholds::default()
    });
    let sizes: Vec<usize> = vec![16, 32, 40, 64, 128, 512];

    let mut group = c.benchmark_group("Karatsuba");
    for &n in &sizes {
        let (x, y) = (operand(n, 1), operand(n, 2));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            let mut z = Nat::new();
            b.iter(|| z.mul(&x, &y, &ctx));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("Schoolbook");
    for &n in &sizes {
        let (x, y) = (operand(n, 1), operand(n, 2));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            let mut z = Nat::new();
            b.iter(|| z.mul(&x, &y, &schoolbook));
        });
    }
    group.finish();
}

fn bench_div(c: &mut Criterion) {
    let ctx = Context::default();
    let basic = Context::with_thresholds(Thresholds {
        div_recursive: usize::MAX,
        ..Thresholds::default()
    });
    let sizes: Vec<usize> = vec![50, 100, 200, 400];

    let mut group = c.benchmark_group("BurnikelZiegler");
    for &n in &sizes {
        let (u, v) = (operand(2 * n, 3), operand(n, 4));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            let (mut q, mut r) = (Nat::new(), Nat::new());
            b.iter(|| q.div(&mut r, &u, &v, &ctx));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("AlgorithmD");
    for &n in &sizes {
        let (u, v) = (operand(2 * n, 3), operand(n, 4));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            let (mut q, mut r) = (Nat::new(), Nat::new());
            b.iter(|| q.div(&mut r, &u, &v, &basic));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_mul, bench_div);
criterion_main!(benches);
