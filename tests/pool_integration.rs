//! Integration tests for scratch buffer reuse through a shared `WordPool`.

use std::sync::Arc;

use num_bigint::BigInt;
use rayon::prelude::*;

use mparith_core::Int;
use mparith_memory::WordPool;
use mparith_nat::{Context, Nat, Thresholds};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn operand(words: usize, seed: u64) -> Int {
    let mut s = seed | 1;
    let abs = Nat::from_words(
        (0..words)
            .map(|_| {
                s ^= s << 13;
                s ^= s >> 7;
                s ^= s << 17;
                s
            })
            .collect(),
    );
    Int::from_parts(seed % 3 == 0, abs)
}

fn big(x: &Int) -> BigInt {
    x.to_string().parse().unwrap()
}

#[test]
fn repeated_division_reuses_scratch() {
    init_tracing();
    let ctx = Context::with_pool(Arc::new(WordPool::default()));
    let (u, v) = (operand(60, 1), operand(20, 2));

    let (mut q, mut r) = (Int::new(), Int::new());
    for _ in 0..4 {
        q.quo_rem(&mut r, &u, &v, &ctx);
    }
    let stats = ctx.pool().stats();
    assert!(stats.hits > 0, "{stats:?}");
    assert!(stats.hit_rate() > 0.0);
    assert_eq!(big(&q), big(&u) / big(&v));
}

#[test]
fn threads_share_one_pool() {
    init_tracing();
    let pool = Arc::new(WordPool::default());
    let low = Thresholds {
        karatsuba: 8,
        div_recursive: 12,
        ..Thresholds::default()
    };

    let results: Vec<(Int, Int, Int)> = (0..32u64)
        .into_par_iter()
        .map(|i| {
            let ctx = Context::new(low, Arc::clone(&pool));
            let (x, y) = (operand(40 + i as usize, i + 1), operand(25, i + 100));
            let mut z = Int::new();
            z.mul(&x, &y, &ctx);
            let (mut q, mut r) = (Int::new(), Int::new());
            q.div_mod(&mut r, &z, &y, &ctx);
            (x, q, r)
        })
        .collect();

    for (x, q, r) in &results {
        assert_eq!(q, x);
        assert!(r.is_zero());
    }
    assert!(pool.stats().hits + pool.stats().misses > 0);
}

#[test]
fn results_do_not_depend_on_pool_state() {
    init_tracing();
    let cold = Context::with_pool(Arc::new(WordPool::new(0, 0)));
    let warm = Context::default();
    warm.pool().warm(64, 8);

    let (u, v) = (operand(120, 7), operand(33, 8));
    let (mut q1, mut r1, mut q2, mut r2) = (Int::new(), Int::new(), Int::new(), Int::new());
    q1.quo_rem(&mut r1, &u, &v, &cold);
    q2.quo_rem(&mut r2, &u, &v, &warm);
    assert_eq!((q1, r1), (q2, r2));
    assert_eq!(cold.pool().total_pooled(), 0);
}
