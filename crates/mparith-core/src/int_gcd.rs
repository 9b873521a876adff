//! Greatest common divisors with Lehmer's algorithm.
//!
//! The leading words of the two operands simulate several Euclidean steps
//! in single precision; the resulting cosequence matrix is then applied to
//! the full operands in one multi-precision update. When the simulation
//! cannot bound even one quotient, a plain Euclidean step is taken.
//! The stopping condition is Collins' (see Jebelean, "Improving the
//! multiprecision Euclidean algorithm"), which needs a single quotient per
//! step and cannot overflow a word.

use std::mem;

use mparith_nat::{Context, Nat, Word, WORD_BITS};

use crate::int::Int;

/// Cosequence of a simulated run of Euclidean steps.
///
/// The update it describes is
///
/// ```text
/// A' = u0*A + v0*B
/// B' = u1*A + v1*B
/// ```
///
/// The words hold magnitudes only. For an even number of steps `u0` and `v1`
/// are non-negative while `u1` and `v0` are non-positive; odd runs flip all
/// four signs.
#[derive(Debug, Clone, Copy)]
struct Cosequence {
    u0: Word,
    u1: Word,
    v0: Word,
    v1: Word,
    even: bool,
}

/// Scratch values reused across the update steps.
#[derive(Default)]
struct Scratch {
    q: Int,
    r: Int,
    s: Int,
    t: Int,
}

fn signed_word(neg: bool, w: Word) -> Int {
    Int::from_parts(neg, Nat::from_u64(w))
}

/// Simulate Euclidean steps on the leading word of `a` and `b`.
///
/// Requires `a >= b` and `b` at least two words long.
fn lehmer_simulate(a: &Int, b: &Int) -> Cosequence {
    let aw = a.abs.as_words();
    let bw = b.abs.as_words();
    let (n, m) = (aw.len(), bw.len());

    // top word of bits of a, and of b at the same alignment
    let h = aw[n - 1].leading_zeros();
    let top = |hi: Word, lo: Word| {
        if h == 0 {
            hi
        } else {
            hi << h | lo >> (WORD_BITS as u32 - h)
        }
    };
    let mut a1 = top(aw[n - 1], aw[n - 2]);
    let mut a2 = if n == m {
        top(bw[n - 1], bw[n - 2])
    } else if n == m + 1 && h != 0 {
        // b has an implicit zero word on top
        bw[n - 2] >> (WORD_BITS as u32 - h)
    } else {
        0
    };

    // the first step is odd
    let mut even = false;
    let (mut u0, mut u1, mut u2): (Word, Word, Word) = (0, 1, 0);
    let (mut v0, mut v1, mut v2): (Word, Word, Word) = (0, 0, 1);

    while a2 >= v2 && a1 - a2 >= v1 + v2 {
        let (q, r) = (a1 / a2, a1 % a2);
        (a1, a2) = (a2, r);
        (u0, u1, u2) = (u1, u2, u1 + q * u2);
        (v0, v1, v2) = (v1, v2, v1 + q * v2);
        even = !even;
    }
    Cosequence {
        u0,
        u1,
        v0,
        v1,
        even,
    }
}

impl Cosequence {
    /// Apply the cosequence to the pair `(a, b)`.
    fn update(&self, a: &mut Int, b: &mut Int, tmp: &mut Scratch, ctx: &Context) {
        tmp.t.mul(a, &signed_word(!self.even, self.u0), ctx);
        tmp.s.mul(b, &signed_word(self.even, self.v0), ctx);
        tmp.r.mul(a, &signed_word(self.even, self.u1), ctx);
        tmp.q.mul(b, &signed_word(!self.even, self.v1), ctx);
        a.add(&tmp.t, &tmp.s);
        b.add(&tmp.r, &tmp.q);
    }
}

/// One Euclidean step: `(a, b) = (b, a mod b)`.
///
/// With cofactors, also `(ua, ub) = (ub, ua - q*ub)`.
fn euclid_update(
    a: &mut Int,
    b: &mut Int,
    cofactors: Option<(&mut Int, &mut Int)>,
    tmp: &mut Scratch,
    ctx: &Context,
) {
    tmp.q.quo_rem(&mut tmp.r, a, b, ctx);
    mem::swap(a, b);
    mem::swap(b, &mut tmp.r);

    if let Some((ua, ub)) = cofactors {
        tmp.s.mul(ub, &tmp.q, ctx);
        tmp.t.sub(ua, &tmp.s);
        mem::swap(ua, ub);
        mem::swap(ub, &mut tmp.t);
    }
}

impl Int {
    /// self = gcd(a, b), always non-negative.
    ///
    /// `gcd(0, 0)` is 0 and `gcd(a, 0)` is `|a|`.
    pub fn gcd(&mut self, a: &Int, b: &Int, ctx: &Context) {
        self.gcd_with(None, None, a, b, ctx);
    }

    /// Extended GCD: self = gcd(a, b) together with Bézout coefficients
    /// `x` and `y` such that `a*x + b*y = self`.
    ///
    /// With `a == 0` the coefficients are `x = 0` and `y = sign(b)`;
    /// with `b == 0` they are `x = sign(a)` and `y = 0`.
    pub fn gcd_ext(&mut self, x: &mut Int, y: &mut Int, a: &Int, b: &Int, ctx: &Context) {
        self.gcd_with(Some(x), Some(y), a, b, ctx);
    }

    pub(crate) fn gcd_with(
        &mut self,
        x: Option<&mut Int>,
        y: Option<&mut Int>,
        a: &Int,
        b: &Int,
        ctx: &Context,
    ) {
        if a.is_zero() || b.is_zero() {
            if a.is_zero() {
                self.abs(b);
            } else {
                self.abs(a);
            }
            if let Some(x) = x {
                *x = Int::from_i64(i64::from(a.sign()));
            }
            if let Some(y) = y {
                *y = Int::from_i64(i64::from(b.sign()));
            }
            return;
        }
        self.lehmer_gcd(x, y, a, b, ctx);
    }

    fn lehmer_gcd(
        &mut self,
        x: Option<&mut Int>,
        y: Option<&mut Int>,
        a: &Int,
        b: &Int,
        ctx: &Context,
    ) {
        let extended = x.is_some() || y.is_some();

        let mut big_a = Int::new();
        let mut big_b = Int::new();
        big_a.abs(a);
        big_b.abs(b);

        // ua (ub) counts how often a has been accumulated into A (B)
        let mut ua = Int::from_u64(1);
        let mut ub = Int::new();

        let mut tmp = Scratch::default();

        if big_a.abs < big_b.abs {
            mem::swap(&mut big_a, &mut big_b);
            mem::swap(&mut ua, &mut ub);
        }

        // invariant: A >= B
        while big_b.abs.len() > 1 {
            let cs = lehmer_simulate(&big_a, &big_b);
            if cs.v0 != 0 {
                cs.update(&mut big_a, &mut big_b, &mut tmp, ctx);
                if extended {
                    cs.update(&mut ua, &mut ub, &mut tmp, ctx);
                }
            } else {
                let cofactors = extended.then_some((&mut ua, &mut ub));
                euclid_update(&mut big_a, &mut big_b, cofactors, &mut tmp, ctx);
            }
        }

        if !big_b.is_zero() {
            if big_a.abs.len() > 1 {
                let cofactors = extended.then_some((&mut ua, &mut ub));
                euclid_update(&mut big_a, &mut big_b, cofactors, &mut tmp, ctx);
            }
            if !big_b.is_zero() {
                // both fit a single word
                let (mut aw, mut bw) = (big_a.abs.low_u64(), big_b.abs.low_u64());
                if extended {
                    let (mut wa, mut wb): (Word, Word) = (1, 0);
                    let (mut va, mut vb): (Word, Word) = (0, 1);
                    let mut even = true;
                    while bw != 0 {
                        let (q, r) = (aw / bw, aw % bw);
                        (aw, bw) = (bw, r);
                        (wa, wb) = (wb, wa + q * wb);
                        (va, vb) = (vb, va + q * vb);
                        even = !even;
                    }
                    tmp.t.mul(&ua, &signed_word(!even, wa), ctx);
                    tmp.s.mul(&ub, &signed_word(even, va), ctx);
                    ua.add(&tmp.t, &tmp.s);
                } else {
                    while bw != 0 {
                        (aw, bw) = (bw, aw % bw);
                    }
                }
                big_a.abs.set_u64(aw);
            }
        }

        if let Some(y) = y {
            // y = (g - |a|*ua) / b, an exact division
            let mut abs_a = Int::new();
            abs_a.abs(a);
            tmp.t.mul(&abs_a, &ua, ctx);
            tmp.s.sub(&big_a, &tmp.t);
            y.quo(&tmp.s, b, ctx);
        }
        if let Some(x) = x {
            if a.neg {
                x.neg(&ua);
            } else {
                *x = ua;
            }
        }
        *self = big_a;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(x: i64) -> Int {
        Int::from_i64(x)
    }

    fn big(s: &str) -> Int {
        Int::from_str_radix(s, 10).unwrap()
    }

    fn check_bezout(a: &Int, b: &Int) -> Int {
        let ctx = Context::default();
        let (mut g, mut x, mut y) = (Int::new(), Int::new(), Int::new());
        g.gcd_ext(&mut x, &mut y, a, b, &ctx);

        let (mut ax, mut by, mut sum) = (Int::new(), Int::new(), Int::new());
        ax.mul(a, &x, &ctx);
        by.mul(b, &y, &ctx);
        sum.add(&ax, &by);
        assert_eq!(sum, g, "a*x + b*y for a={a}, b={b}");

        let mut plain = Int::new();
        plain.gcd(a, b, &ctx);
        assert_eq!(plain, g);
        g
    }

    #[test]
    fn zero_conventions() {
        let ctx = Context::default();
        let (mut g, mut x, mut y) = (Int::new(), Int::new(), Int::new());
        g.gcd_ext(&mut x, &mut y, &int(0), &int(0), &ctx);
        assert!(g.is_zero() && x.is_zero() && y.is_zero());

        g.gcd_ext(&mut x, &mut y, &int(0), &int(-7), &ctx);
        assert_eq!((g.clone(), x.clone(), y.clone()), (int(7), int(0), int(-1)));

        g.gcd_ext(&mut x, &mut y, &int(-9), &int(0), &ctx);
        assert_eq!((g, x, y), (int(9), int(-1), int(0)));
    }

    #[test]
    fn single_word() {
        assert_eq!(check_bezout(&int(240), &int(46)), int(2));
        assert_eq!(check_bezout(&int(-240), &int(46)), int(2));
        assert_eq!(check_bezout(&int(240), &int(-46)), int(2));
        assert_eq!(check_bezout(&int(17), &int(5)), int(1));
        assert_eq!(check_bezout(&int(5), &int(17)), int(1));
        assert_eq!(check_bezout(&int(12), &int(12)), int(12));
    }

    #[test]
    fn multiword_with_known_factor() {
        let ctx = Context::default();
        let g = big("340282366920938463463374607431768211297");
        let p = big("1000000000000000000000000000057");
        let q = big("99999999999999999999999999999999999999977");
        let (mut a, mut b) = (Int::new(), Int::new());
        a.mul(&g, &p, &ctx);
        b.mul(&g, &q, &ctx);
        let d = check_bezout(&a, &b);
        // p and q share no factor with each other
        let mut r = Int::new();
        r.rem(&d, &g, &ctx);
        assert!(r.is_zero());
        let mut neg_b = Int::new();
        neg_b.neg(&b);
        check_bezout(&neg_b, &a);
    }

    #[test]
    fn consecutive_fibonacci_numbers() {
        // consecutive Fibonacci numbers are the slowest case for Euclid
        let (mut f0, mut f1) = (int(0), int(1));
        for _ in 0..400 {
            let mut next = Int::new();
            next.add(&f0, &f1);
            f0 = f1;
            f1 = next;
        }
        assert!(f1.bit_len() > 250);
        assert_eq!(check_bezout(&f1, &f0), int(1));
    }

    #[test]
    fn very_different_lengths() {
        let ctx = Context::default();
        // forces plain Euclidean steps: the leading words never overlap
        let mut a = Int::new();
        a.abs.shl(&Nat::from_u64(3), 1000);
        let b = big("123456789012345678901234567890");
        let g = check_bezout(&a, &b);
        let mut expected = Int::new();
        expected.gcd(&b, &a, &ctx);
        assert_eq!(g, expected);
        assert_eq!(g, int(6));
    }
}
