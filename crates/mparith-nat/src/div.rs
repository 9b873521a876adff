//! Division.
//!
//! Single-word divisors use a straight word-by-word loop. Longer divisors
//! are normalized so their top bit is set and then divided with Knuth's
//! Algorithm D, or, from [`Thresholds::div_recursive`](crate::Thresholds)
//! words on, with the Burnikel-Ziegler recursion which trades the
//! quadratic inner loop for half-size divisions and multiplications.

use std::cmp::Ordering;

use crate::arith::{self, Word};
use crate::context::Context;
use crate::nat::{add_at, cmp_words, norm_len, normalized, Nat};

/// Whether `x1:x2 > y1:y2` as double words.
#[inline]
fn greater_than(x1: Word, x2: Word, y1: Word, y2: Word) -> bool {
    x1 > y1 || (x1 == y1 && x2 > y2)
}

/// Knuth's Algorithm D: q = u / v, leaving the remainder in `u`.
///
/// `v` must have at least two words and its top bit set; `u` must be at
/// least as long as `v`. `q` needs `u.len() - v.len() + 1` words, or one
/// fewer if the top quotient word is known to be zero.
fn div_basic(q: &mut [Word], u: &mut [Word], v: &[Word], ctx: &Context) {
    let n = v.len();
    let m = u.len() - n;
    let mut qhatv = ctx.pool().acquire(n + 1);

    let vn1 = v[n - 1];
    let vn2 = v[n - 2];
    for j in (0..=m).rev() {
        // D3: estimate the quotient digit from the top two words of u
        let mut qhat = Word::MAX;
        let ujn = if j + n < u.len() { u[j + n] } else { 0 };
        if ujn != vn1 {
            let (q0, mut rhat) = arith::div_wide(ujn, u[j + n - 1], vn1);
            qhat = q0;
            let (mut x2, mut x1) = arith::mul_wide(qhat, vn2);
            let ujn2 = u[j + n - 2];
            while greater_than(x1, x2, rhat, ujn2) {
                qhat -= 1;
                let prev = rhat;
                rhat = rhat.wrapping_add(vn1);
                if rhat < prev {
                    break;
                }
                (x2, x1) = arith::mul_wide(qhat, vn2);
            }
        }

        // D4: u -= qhat * v << (64*j), adding v back if qhat was one too big
        qhatv[n] = arith::mul_add_vww(&mut qhatv[..n], v, qhat, 0);
        let mut qhl = n + 1;
        if j + qhl > u.len() && qhatv[n] == 0 {
            qhl -= 1;
        }
        let c = arith::sub_vv_in(&mut u[j..j + qhl], &qhatv[..qhl]);
        if c != 0 {
            let c = arith::add_vv_in(&mut u[j..j + n], v);
            // when qhl == n the two carries cancel out
            if n < qhl {
                u[j + n] = u[j + n].wrapping_add(c);
            }
            qhat -= 1;
        }

        if j == m && m == q.len() && qhat == 0 {
            continue;
        }
        q[j] = qhat;
    }
    ctx.pool().release(qhatv);
}

/// Burnikel-Ziegler entry point: z = u / v, remainder left in `u`.
fn div_recursive(z: &mut [Word], u: &mut [Word], v: &[Word], ctx: &Context) {
    z.fill(0);
    div_recursive_step(z, u, v, ctx);
}

/// One level of the recursion. Adds `u / v` into `z` and leaves the
/// remainder in `u`.
fn div_recursive_step(z: &mut [Word], u: &mut [Word], v: &[Word], ctx: &Context) {
    let ul = norm_len(u);
    let u = &mut u[..ul];
    let v = normalized(v);

    if u.is_empty() {
        z.fill(0);
        return;
    }
    let n = v.len();
    if u.len() < n {
        return;
    }
    if n < ctx.thresholds().div_recursive {
        div_basic(z, u, v, ctx);
        return;
    }
    let m = u.len() - n;

    // Produce the quotient in blocks of b words. Each block costs one
    // division of size n/2 and one multiplication of size n/2.
    let b = n / 2;
    // Split v = vh << s + vl with s = b-1. Then floor(uh/vh) >= floor(u/v)
    // and the difference is at most 2, since len(vh) >= b+1 >= len(u/v).
    let s = b - 1;
    let (vl, vh) = v.split_at(s);
    let vl = normalized(vl);

    let mut qhat = Nat::scratch(ctx, n);
    let mut qhatv = Nat::scratch(ctx, 3 * n);

    let mut j = m;
    while j > b {
        // divide u[j-b..j+n] by v, keeping the remainder in u
        let uu = &mut u[j - b..];
        block_step(&mut qhat, &mut qhatv, uu, s, b + n, vh, vl, ctx);
        add_at(z, &qhat.words, j - b);
        j -= b;
    }

    // now u < v << b: compute the low block the same way
    let end = u.len();
    block_step(&mut qhat, &mut qhatv, u, s, end, vh, vl, ctx);
    add_at(z, &qhat.words, 0);

    qhat.recycle(ctx);
    qhatv.recycle(ctx);
}

/// Divide `uu[..end]` by `vh << s + vl`, leaving the quotient block in
/// `qhat` and the remainder in `uu`.
#[allow(clippy::too_many_arguments)]
fn block_step(
    qhat: &mut Nat,
    qhatv: &mut Nat,
    uu: &mut [Word],
    s: usize,
    end: usize,
    vh: &[Word],
    vl: &[Word],
    ctx: &Context,
) {
    // quotient of the high parts; the remainder replaces uu[s..end]
    let ql = vh.len() + 1;
    let q = qhat.make(ql.max(end - s));
    div_recursive_step(q, &mut uu[s..end], vh, ctx);
    qhat.norm();

    // u = rh << s + ul still needs qhat * vl taken off. qhat may be up
    // to two too large; add vh back once per decrement.
    qhatv.mul_words(&qhat.words, vl, ctx);
    for _ in 0..2 {
        if cmp_words(&qhatv.words, normalized(uu)) != Ordering::Greater {
            break;
        }
        qhat.sub_word_assign(1);
        qhatv.sub_words_assign(vl);
        add_at(&mut uu[s..], vh, 0);
    }
    assert!(
        cmp_words(&qhatv.words, normalized(uu)) != Ordering::Greater,
        "recursive division failed to converge"
    );
    let ql = qhatv.len();
    let c = arith::sub_vv_in(&mut uu[..ql], &qhatv.words);
    if c > 0 {
        let c = arith::sub_scalar(&mut uu[ql..], c);
        assert!(c == 0, "recursive division remainder underflow");
    }
}

/// q = u / v and r = u % v for a normalized `v` of at least two words,
/// `u >= v`.
fn div_large(q: &mut Nat, r: &mut Nat, u_in: &[Word], v_in: &[Word], ctx: &Context) {
    let n = v_in.len();
    let m = u_in.len() - n;

    // D1: shift so the divisor's top bit is set
    let shift = v_in[n - 1].leading_zeros();
    let mut v = ctx.pool().acquire(n);
    arith::shl_vu(&mut v, v_in, shift);

    let ulen = u_in.len();
    let u = r.make(ulen + 1);
    u[ulen] = arith::shl_vu(&mut u[..ulen], u_in, shift);

    let qw = q.make(m + 1);
    if n < ctx.thresholds().div_recursive {
        div_basic(qw, u, &v, ctx);
    } else {
        tracing::trace!(u = ulen, v = n, "recursive division");
        div_recursive(qw, u, &v, ctx);
    }
    ctx.pool().release(v);

    q.norm();
    arith::shr_vu_in(&mut r.words, shift);
    r.norm();
}

impl Nat {
    /// self = u / v and r = u % v.
    ///
    /// # Panics
    ///
    /// Panics if `v` is zero.
    pub fn div(&mut self, r: &mut Nat, u: &Nat, v: &Nat, ctx: &Context) {
        assert!(!v.is_zero(), "division by zero");
        if u < v {
            self.clear();
            r.set(u);
            return;
        }
        if v.len() == 1 {
            let rw = self.div_w(u, v.words[0]);
            r.set_u64(rw);
            return;
        }
        div_large(self, r, &u.words, &v.words, ctx);
    }

    /// self = u % v.
    ///
    /// # Panics
    ///
    /// Panics if `v` is zero.
    pub fn rem(&mut self, u: &Nat, v: &Nat, ctx: &Context) {
        let mut q = Nat::scratch(ctx, u.len().saturating_sub(v.len()) + 1);
        q.div(self, u, v, ctx);
        q.recycle(ctx);
    }

    /// self = x / y for a single word, returning the remainder.
    ///
    /// # Panics
    ///
    /// Panics if `y` is zero.
    pub fn div_w(&mut self, x: &Nat, y: Word) -> Word {
        assert!(y != 0, "division by zero");
        if y == 1 {
            self.set(x);
            return 0;
        }
        let m = x.len();
        if m == 0 {
            self.clear();
            return 0;
        }
        let z = self.make(m);
        let r = arith::div_wvw(z, 0, &x.words, y);
        self.norm();
        r
    }

    /// self /= y for a single word, returning the remainder.
    ///
    /// # Panics
    ///
    /// Panics if `y` is zero.
    pub fn div_w_assign(&mut self, y: Word) -> Word {
        assert!(y != 0, "division by zero");
        let r = arith::div_wvw_in(&mut self.words, 0, y);
        self.norm();
        r
    }

    /// x % d for a single word.
    ///
    /// # Panics
    ///
    /// Panics if `d` is zero.
    #[must_use]
    pub fn mod_w(&self, d: Word) -> Word {
        assert!(d != 0, "division by zero");
        self.words
            .iter()
            .rev()
            .fold(0, |r, &w| arith::div_wide(r, w, d).1)
    }
}
