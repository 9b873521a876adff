//! Multiplication and squaring.
//!
//! Short operands use schoolbook multiplication. From
//! [`Thresholds::karatsuba`](crate::Thresholds) words on, the operands are
//! split at a power-of-two boundary and the low parts are multiplied with
//! Karatsuba's three-product recursion; the remaining high parts are
//! added in with ordinary products. Squaring has its own, later crossover.

use crate::arith::{self, Word};
use crate::context::Context;
use crate::nat::{add_at, normalized, Nat};

/// z[..x.len()+y.len()] = x * y.
fn basic_mul(z: &mut [Word], x: &[Word], y: &[Word]) {
    let m = x.len();
    z[..m + y.len()].fill(0);
    for (i, &d) in y.iter().enumerate() {
        if d != 0 {
            z[m + i] = arith::add_mul_vvw(&mut z[i..i + m], x, d);
        }
    }
}

/// z[..n] += x[..n], carrying into z[n..n + n/2].
fn karatsuba_add(z: &mut [Word], x: &[Word], n: usize) {
    let c = arith::add_vv_in(&mut z[..n], &x[..n]);
    if c != 0 {
        arith::add_scalar(&mut z[n..n + (n >> 1)], c);
    }
}

/// z[..n] -= x[..n], borrowing from z[n..n + n/2].
fn karatsuba_sub(z: &mut [Word], x: &[Word], n: usize) {
    let c = arith::sub_vv_in(&mut z[..n], &x[..n]);
    if c != 0 {
        arith::sub_scalar(&mut z[n..n + (n >> 1)], c);
    }
}

/// Largest `n >> i << i` with `n >> i <= threshold`: the Karatsuba
/// length for an operand of `n` words.
pub(crate) fn karatsuba_len(mut n: usize, threshold: usize) -> usize {
    let mut i = 0;
    while n > threshold {
        n >>= 1;
        i += 1;
    }
    n << i
}

/// z[..2n] = x * y for `x.len() == y.len() == n`.
///
/// `z` must have room for `6n` words; everything past `2n` is scratch.
fn karatsuba(z: &mut [Word], x: &[Word], y: &[Word], threshold: usize) {
    let n = y.len();

    // odd or small lengths go to the schoolbook method
    if n & 1 != 0 || n < threshold || n < 2 {
        basic_mul(z, x, y);
        return;
    }

    // x = x1*b + x0, y = y1*b + y0 with b = 2^(64*n2):
    //   x*y = z2*b^2 + (z2 + z0 + p)*b + z0
    // where z2 = x1*y1, z0 = x0*y0 and p = (x1 - x0)*(y0 - y1).
    let n2 = n >> 1;
    let (x0, x1) = x.split_at(n2);
    let (y0, y1) = y.split_at(n2);

    karatsuba(z, x0, y0, threshold);
    karatsuba(&mut z[n..], x1, y1, threshold);

    let mut positive = true;
    {
        let (xd, yd) = z[2 * n..3 * n].split_at_mut(n2);
        if arith::sub_vv(xd, x1, x0) != 0 {
            positive = !positive;
            arith::sub_vv(xd, x0, x1);
        }
        if arith::sub_vv(yd, y0, y1) != 0 {
            positive = !positive;
            arith::sub_vv(yd, y1, y0);
        }
    }

    {
        let (low, high) = z.split_at_mut(3 * n);
        let (xd, yd) = low[2 * n..].split_at(n2);
        karatsuba(high, xd, yd, threshold);
    }

    // keep z2:z0 above p; recursion is done so the top of z is free
    let (head, saved) = z.split_at_mut(4 * n);
    saved[..2 * n].copy_from_slice(&head[..2 * n]);
    let (low, p) = head.split_at_mut(3 * n);
    let target = &mut low[n2..];
    karatsuba_add(target, &saved[..n], n);
    karatsuba_add(target, &saved[n..2 * n], n);
    if positive {
        karatsuba_add(target, p, n);
    } else {
        karatsuba_sub(target, p, n);
    }
}

/// z[..2n] = x * x for `n = x.len()` using the half-products trick.
fn basic_sqr(z: &mut [Word], x: &[Word], ctx: &Context) {
    let n = x.len();
    let mut t = ctx.pool().acquire(2 * n);
    let (lo, hi) = arith::mul_wide(x[0], x[0]);
    z[0] = lo;
    z[1] = hi;
    for i in 1..n {
        let d = x[i];
        let (lo, hi) = arith::mul_wide(d, d);
        z[2 * i] = lo;
        z[2 * i + 1] = hi;
        t[2 * i] = arith::add_mul_vvw(&mut t[i..2 * i], &x[..i], d);
    }
    // double the cross products
    t[2 * n - 1] = arith::shl_vu_in(&mut t[1..2 * n - 1], 1);
    arith::add_vv_in(&mut z[..2 * n], &t);
    ctx.pool().release(t);
}

/// z[..2n] = x * x for `n = x.len()`; `z` needs `6n` words of room.
fn karatsuba_sqr(z: &mut [Word], x: &[Word], threshold: usize, ctx: &Context) {
    let n = x.len();
    if n & 1 != 0 || n < threshold || n < 2 {
        basic_sqr(&mut z[..2 * n], x, ctx);
        return;
    }

    let n2 = n >> 1;
    let (x0, x1) = x.split_at(n2);

    karatsuba_sqr(z, x0, threshold, ctx);
    karatsuba_sqr(&mut z[n..], x1, threshold, ctx);

    {
        let xd = &mut z[2 * n..2 * n + n2];
        if arith::sub_vv(xd, x1, x0) != 0 {
            arith::sub_vv(xd, x0, x1);
        }
    }

    {
        let (low, high) = z.split_at_mut(3 * n);
        karatsuba_sqr(high, &low[2 * n..2 * n + n2], threshold, ctx);
    }

    let (head, saved) = z.split_at_mut(4 * n);
    saved[..2 * n].copy_from_slice(&head[..2 * n]);
    let (low, p) = head.split_at_mut(3 * n);
    let target = &mut low[n2..];
    karatsuba_add(target, &saved[..n], n);
    karatsuba_add(target, &saved[n..2 * n], n);
    // (x1 - x0)^2 is never negative, so the middle term is always subtracted
    karatsuba_sub(target, p, n);
}

impl Nat {
    /// self = x * y.
    pub fn mul(&mut self, x: &Nat, y: &Nat, ctx: &Context) {
        self.mul_words(&x.words, &y.words, ctx);
    }

    pub(crate) fn mul_words(&mut self, x: &[Word], y: &[Word], ctx: &Context) {
        let (x, y) = (normalized(x), normalized(y));
        let (x, y) = if x.len() < y.len() { (y, x) } else { (x, y) };
        let (m, n) = (x.len(), y.len());
        if n == 0 {
            self.clear();
            return;
        }
        if n == 1 {
            let z = self.make(m + 1);
            z[m] = arith::mul_add_vww(&mut z[..m], x, y[0], 0);
            self.norm();
            return;
        }

        let threshold = ctx.thresholds().karatsuba;
        if n < threshold {
            basic_mul(self.make(m + n), x, y);
            self.norm();
            return;
        }

        // x = xh*b + x0, y = yh*b + y0 with b = 2^(64*k)
        let k = karatsuba_len(n, threshold);
        tracing::trace!(m, n, k, "karatsuba multiplication");
        let (x0, y0) = (&x[..k], &y[..k]);
        let z = self.make((6 * k).max(m + n));
        karatsuba(z, x0, y0, threshold);
        self.words.truncate(m + n);
        self.words[2 * k..].fill(0);

        // Add the missing terms x0*y1*b and xi*y0*b^i, xi*y1*b^(i+1).
        // All yi for i > 1 are zero by choice of k.
        if k < n || m != n {
            let mut t = Nat::scratch(ctx, 3 * k);
            let x0 = normalized(x0);
            let y1 = &y[k..];
            t.mul_words(x0, y1, ctx);
            add_at(&mut self.words, &t.words, k);

            let y0 = normalized(y0);
            let mut i = k;
            while i < m {
                let xi = normalized(&x[i..(i + k).min(m)]);
                t.mul_words(xi, y0, ctx);
                add_at(&mut self.words, &t.words, i);
                t.mul_words(xi, y1, ctx);
                add_at(&mut self.words, &t.words, i + k);
                i += k;
            }
            t.recycle(ctx);
        }
        self.norm();
    }

    /// self = x * x.
    pub fn sqr(&mut self, x: &Nat, ctx: &Context) {
        self.sqr_words(&x.words, ctx);
    }

    pub(crate) fn sqr_words(&mut self, x: &[Word], ctx: &Context) {
        let x = normalized(x);
        let n = x.len();
        match n {
            0 => {
                self.clear();
                return;
            }
            1 => {
                let (lo, hi) = arith::mul_wide(x[0], x[0]);
                let z = self.make(2);
                z[0] = lo;
                z[1] = hi;
                self.norm();
                return;
            }
            _ => {}
        }

        let t = ctx.thresholds();
        if n < t.basic_sqr {
            basic_mul(self.make(2 * n), x, x);
            self.norm();
            return;
        }
        if n < t.karatsuba_sqr {
            basic_sqr(self.make(2 * n), x, ctx);
            self.norm();
            return;
        }

        // x = x1*b + x0 with b = 2^(64*k):
        //   x^2 = x1^2*b^2 + 2*x1*x0*b + x0^2
        let threshold = t.karatsuba_sqr;
        let k = karatsuba_len(n, threshold);
        tracing::trace!(n, k, "karatsuba squaring");
        let x0 = &x[..k];
        let z = self.make((6 * k).max(2 * n));
        karatsuba_sqr(z, x0, threshold, ctx);
        self.words.truncate(2 * n);
        self.words[2 * k..].fill(0);

        if k < n {
            let mut t = Nat::scratch(ctx, 2 * k);
            let x0 = normalized(x0);
            let x1 = &x[k..];
            t.mul_words(x0, x1, ctx);
            add_at(&mut self.words, &t.words, k);
            add_at(&mut self.words, &t.words, k);
            t.sqr_words(x1, ctx);
            add_at(&mut self.words, &t.words, 2 * k);
            t.recycle(ctx);
        }
        self.norm();
    }

    /// self = a * (a+1) * ... * b, or 1 when `a > b`.
    pub fn mul_range(&mut self, a: u64, b: u64, ctx: &Context) {
        if a == 0 {
            self.clear();
        } else if a > b {
            self.set_u64(1);
        } else if a == b {
            self.set_u64(a);
        } else if a + 1 == b {
            self.mul(&Nat::from_u64(a), &Nat::from_u64(b), ctx);
        } else {
            let m = a + (b - a) / 2;
            let mut lo = Nat::new();
            let mut hi = Nat::new();
            lo.mul_range(a, m, ctx);
            hi.mul_range(m + 1, b, ctx);
            self.mul(&lo, &hi, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;

    fn pattern(n: usize, seed: u64) -> Nat {
        let mut s = seed | 1;
        let words = (0..n)
            .map(|_| {
                // xorshift64
                s ^= s << 13;
                s ^= s >> 7;
                s ^= s << 17;
                s
            })
            .collect();
        Nat::from_words(words)
    }

    fn schoolbook_ctx() -> Context {
        Context::with_thresholds(Thresholds {
            karatsuba: usize::MAX,
            basic_sqr: usize::MAX,
            karatsuba_sqr: usize::MAX,
            ..Thresholds::default()
        })
    }

    #[test]
    fn karatsuba_len_rounds_down() {
        assert_eq!(karatsuba_len(40, 40), 40);
        assert_eq!(karatsuba_len(41, 40), 40);
        assert_eq!(karatsuba_len(100, 40), 100);
        assert_eq!(karatsuba_len(83, 40), 80);
    }

    #[test]
    fn small_products() {
        let ctx = Context::default();
        let mut z = Nat::new();
        z.mul(&Nat::from_u64(u64::MAX), &Nat::from_u64(u64::MAX), &ctx);
        assert_eq!(z.as_words(), &[1, u64::MAX - 1]);
        z.mul(&Nat::new(), &Nat::from_u64(3), &ctx);
        assert!(z.is_zero());
    }

    #[test]
    fn karatsuba_matches_schoolbook_across_threshold() {
        let ctx = Context::default();
        let basic = schoolbook_ctx();
        for n in 38..=42 {
            for m in [n, n + 1, 2 * n + 3, 5 * n] {
                let x = pattern(m, 7 * m as u64);
                let y = pattern(n, 11 * n as u64);
                let mut fast = Nat::new();
                let mut slow = Nat::new();
                fast.mul(&x, &y, &ctx);
                slow.mul(&x, &y, &basic);
                assert_eq!(fast, slow, "mismatch at m={m} n={n}");
            }
        }
    }

    #[test]
    fn small_threshold_exercises_deep_recursion() {
        let ctx = Context::with_thresholds(Thresholds {
            karatsuba: 4,
            ..Thresholds::default()
        });
        let basic = schoolbook_ctx();
        for n in [8, 9, 16, 31, 64, 100] {
            let x = pattern(n + 5, 3);
            let y = pattern(n, 5);
            let mut fast = Nat::new();
            let mut slow = Nat::new();
            fast.mul(&x, &y, &ctx);
            slow.mul(&x, &y, &basic);
            assert_eq!(fast, slow, "mismatch at n={n}");
        }
    }

    #[test]
    fn sqr_matches_mul() {
        let ctx = Context::with_thresholds(Thresholds {
            karatsuba: 8,
            basic_sqr: 4,
            karatsuba_sqr: 12,
            ..Thresholds::default()
        });
        let basic = schoolbook_ctx();
        for n in [1, 2, 3, 5, 11, 12, 13, 24, 25, 50, 77] {
            let x = pattern(n, 13);
            let mut sq = Nat::new();
            let mut prod = Nat::new();
            sq.sqr(&x, &ctx);
            prod.mul(&x, &x, &basic);
            assert_eq!(sq, prod, "mismatch at n={n}");
        }
    }

    #[test]
    fn default_sqr_paths() {
        let ctx = Context::default();
        let basic = schoolbook_ctx();
        for n in [19, 20, 21, 259, 260, 300] {
            let x = pattern(n, 17);
            let mut sq = Nat::new();
            let mut prod = Nat::new();
            sq.sqr(&x, &ctx);
            prod.mul(&x, &x, &basic);
            assert_eq!(sq, prod, "mismatch at n={n}");
        }
    }

    #[test]
    fn scratch_returns_to_pool() {
        let ctx = Context::default();
        let x = pattern(90, 1);
        let y = pattern(45, 2);
        let mut z = Nat::new();
        z.mul(&x, &y, &ctx);
        assert!(ctx.pool().total_pooled() > 0);
        let before = ctx.pool().stats();
        z.mul(&x, &y, &ctx);
        assert!(ctx.pool().stats().hits > before.hits);
    }

    #[test]
    fn mul_range_factorials() {
        let ctx = Context::default();
        let mut z = Nat::new();
        z.mul_range(1, 20, &ctx);
        assert_eq!(z.as_words(), &[2_432_902_008_176_640_000]);
        z.mul_range(5, 4, &ctx);
        assert_eq!(z.as_words(), &[1]);
        z.mul_range(0, 10, &ctx);
        assert!(z.is_zero());
        z.mul_range(1, 30, &ctx);
        assert_eq!(z.to_string(), "265252859812191058636308480000000");
    }
}
