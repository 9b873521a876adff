//! Exponentiation and square roots.

use std::mem;

use crate::arith::{self, Word, WORD_BITS};
use crate::context::Context;
use crate::nat::{cmp_words, Nat};

/// Window width, in bits, of the fixed-window exponentiations.
const WINDOW: usize = 4;

impl Nat {
    /// self = x**y mod m, or plain x**y when `m` is zero.
    ///
    /// Long exponents switch to a 4-bit window: with Montgomery
    /// multiplication when `m` is odd, with a division per step otherwise.
    pub fn exp(&mut self, x: &Nat, y: &Nat, m: &Nat, ctx: &Context) {
        // x**y mod 1 == 0
        if m.len() == 1 && m.words[0] == 1 {
            self.clear();
            return;
        }
        if y.is_zero() {
            self.set_u64(1);
            return;
        }
        if x.is_zero() {
            self.clear();
            return;
        }
        if y.len() == 1 && y.words[0] == 1 {
            if m.is_zero() {
                self.set(x);
            } else {
                self.rem(x, m, ctx);
            }
            return;
        }

        if x > &Nat::from_u64(1) && y.len() > 1 && !m.is_zero() {
            if m.words[0] & 1 == 1 {
                tracing::trace!(bits = m.bit_len(), "montgomery exponentiation");
                self.exp_montgomery(x, y, m, ctx);
            } else {
                tracing::trace!(bits = m.bit_len(), "windowed exponentiation");
                self.exp_windowed(x, y, m, ctx);
            }
            return;
        }

        self.exp_binary(x, y, m, ctx);
    }

    /// self = x**y for single words.
    pub fn pow_u64(&mut self, x: u64, y: u64, ctx: &Context) {
        self.exp(&Nat::from_u64(x), &Nat::from_u64(y), &Nat::new(), ctx);
    }

    /// Left-to-right binary exponentiation, reducing after every step when
    /// `m` is non-zero.
    fn exp_binary(&mut self, x: &Nat, y: &Nat, m: &Nat, ctx: &Context) {
        let mut z = x.clone();
        let mut zz = Nat::new();
        let mut q = Nat::new();
        let mut r = Nat::new();
        // the leading one bit of y is consumed by z = x
        for i in (0..y.bit_len() - 1).rev() {
            zz.sqr(&z, ctx);
            mem::swap(&mut z, &mut zz);
            if y.bit(i) == 1 {
                zz.mul(x, &z, ctx);
                mem::swap(&mut z, &mut zz);
            }
            if !m.is_zero() {
                q.div(&mut r, &z, m, ctx);
                mem::swap(&mut z, &mut r);
            }
        }
        *self = z;
    }

    /// 4-bit fixed-window exponentiation with a reduction per step.
    fn exp_windowed(&mut self, x: &Nat, y: &Nat, m: &Nat, ctx: &Context) {
        let mut q = Nat::new();
        let mut r = Nat::new();
        let mut zz = Nat::new();

        // powers[i] = x**i mod m
        let mut powers: Vec<Nat> = Vec::with_capacity(1 << WINDOW);
        powers.push(Nat::from_u64(1));
        powers.push(x.clone());
        for i in (2..1 << WINDOW).step_by(2) {
            let mut p = Nat::new();
            p.sqr(&powers[i / 2], ctx);
            q.div(&mut r, &p, m, ctx);
            mem::swap(&mut p, &mut r);
            let mut p1 = Nat::new();
            p1.mul(&p, x, ctx);
            q.div(&mut r, &p1, m, ctx);
            mem::swap(&mut p1, &mut r);
            powers.push(p);
            powers.push(p1);
        }

        let mut z = Nat::from_u64(1);
        for i in (0..y.len()).rev() {
            let mut yi = y.words[i];
            for j in (0..WORD_BITS).step_by(WINDOW) {
                if i != y.len() - 1 || j != 0 {
                    for _ in 0..WINDOW {
                        zz.sqr(&z, ctx);
                        q.div(&mut z, &zz, m, ctx);
                    }
                }
                zz.mul(&z, &powers[(yi >> (WORD_BITS - WINDOW)) as usize], ctx);
                q.div(&mut z, &zz, m, ctx);
                yi <<= WINDOW;
            }
        }
        *self = z;
    }

    /// 4-bit fixed-window exponentiation in Montgomery form. `m` must be
    /// odd.
    fn exp_montgomery(&mut self, x: &Nat, y: &Nat, m: &Nat, ctx: &Context) {
        let n = m.len();
        let mw = &m.words;

        // bring x down to at most n words, then pad to exactly n
        let mut xr = Nat::new();
        let xw: Vec<Word> = if x.len() > n {
            xr.rem(x, m, ctx);
            padded(&xr.words, n)
        } else {
            padded(&x.words, n)
        };

        // k0 = -m**-1 mod 2**64 by Newton iteration
        let mut k0 = 2u64.wrapping_sub(mw[0]);
        let mut t = mw[0].wrapping_sub(1);
        let mut i = 1;
        while i < WORD_BITS {
            t = t.wrapping_mul(t);
            k0 = k0.wrapping_mul(t.wrapping_add(1));
            i <<= 1;
        }
        let k0 = k0.wrapping_neg();

        // rr = 2**(2*64*n) mod m
        let mut big = Nat::new();
        big.shl(&Nat::from_u64(1), 2 * n * WORD_BITS);
        xr.rem(&big, m, ctx);
        let rr = padded(&xr.words, n);

        let mut one = vec![0; n];
        one[0] = 1;

        let mut scratch = ctx.pool().acquire(2 * n);
        let mut powers: Vec<Vec<Word>> = Vec::with_capacity(1 << WINDOW);
        let mut p = vec![0; n];
        montgomery(&mut p, &mut scratch, &one, &rr, mw, k0);
        powers.push(p);
        let mut p = vec![0; n];
        montgomery(&mut p, &mut scratch, &xw, &rr, mw, k0);
        powers.push(p);
        for i in 2..1 << WINDOW {
            let mut p = vec![0; n];
            montgomery(&mut p, &mut scratch, &powers[i - 1], &powers[1], mw, k0);
            powers.push(p);
        }

        let mut z = powers[0].clone();
        let mut zz = vec![0; n];
        for i in (0..y.len()).rev() {
            let mut yi = y.words[i];
            for j in (0..WORD_BITS).step_by(WINDOW) {
                if i != y.len() - 1 || j != 0 {
                    for _ in 0..WINDOW / 2 {
                        montgomery(&mut zz, &mut scratch, &z, &z, mw, k0);
                        montgomery(&mut z, &mut scratch, &zz, &zz, mw, k0);
                    }
                }
                let w = (yi >> (WORD_BITS - WINDOW)) as usize;
                montgomery(&mut zz, &mut scratch, &z, &powers[w], mw, k0);
                mem::swap(&mut z, &mut zz);
                yi <<= WINDOW;
            }
        }

        // back to the regular representation
        montgomery(&mut zz, &mut scratch, &z, &one, mw, k0);
        ctx.pool().release(scratch);
        let mut result = Nat::from_words(zz);
        if cmp_words(&result.words, mw) != std::cmp::Ordering::Less {
            result.sub_words_assign(mw);
            if result >= *m {
                xr.rem(&result, m, ctx);
                mem::swap(&mut result, &mut xr);
            }
        }
        *self = result;
    }

    /// self = floor(sqrt(x)).
    pub fn sqrt(&mut self, x: &Nat, ctx: &Context) {
        if x <= &Nat::from_u64(1) {
            self.set(x);
            return;
        }
        // Newton's method from a starting point that is >= sqrt(x).
        // The iterates decrease until they reach the root; once the next
        // one stops decreasing, the current one is the answer.
        let mut z1 = Nat::new();
        z1.shl(&Nat::from_u64(1), (x.bit_len() + 1) / 2);
        let mut z2 = Nat::new();
        let mut r = Nat::new();
        loop {
            z2.div(&mut r, x, &z1, ctx);
            z2 += &z1;
            z2.shr_assign(1);
            if z2 >= z1 {
                *self = z1;
                return;
            }
            mem::swap(&mut z1, &mut z2);
        }
    }
}

/// `x` zero-extended to `n` words.
fn padded(x: &[Word], n: usize) -> Vec<Word> {
    let mut v = vec![0; n];
    v[..x.len()].copy_from_slice(x);
    v
}

/// z = x * y * 2**(-64*n) mod m, where all four slices have the same
/// length `n` and `k = -m**-1 mod 2**64`.
///
/// The result is below `2*m` but not necessarily below `m`. `scratch` must
/// hold at least `2*n` words.
fn montgomery(z: &mut [Word], scratch: &mut [Word], x: &[Word], y: &[Word], m: &[Word], k: Word) {
    let n = m.len();
    assert!(
        x.len() == n && y.len() == n && z.len() == n,
        "mismatched montgomery number lengths"
    );
    let t = &mut scratch[..2 * n];
    t.fill(0);
    let mut c: Word = 0;
    for i in 0..n {
        let d = y[i];
        let c2 = arith::add_mul_vvw(&mut t[i..n + i], x, d);
        let u = t[i].wrapping_mul(k);
        let c3 = arith::add_mul_vvw(&mut t[i..n + i], m, u);
        let cx = c.wrapping_add(c2);
        let cy = cx.wrapping_add(c3);
        t[n + i] = cy;
        c = Word::from(cx < c2 || cy < c3);
    }
    if c != 0 {
        arith::sub_vv(z, &t[n..], m);
    } else {
        z.copy_from_slice(&t[n..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conv::Scanner;

    fn nat(s: &str) -> Nat {
        let mut z = Nat::new();
        z.scan(&mut Scanner::new(s), 10, false).unwrap();
        z
    }

    fn exp(x: &Nat, y: &Nat, m: &Nat) -> Nat {
        let mut z = Nat::new();
        z.exp(x, y, m, &Context::default());
        z
    }

    #[test]
    fn trivial_exponents() {
        let x = Nat::from_u64(12345);
        assert_eq!(exp(&x, &Nat::new(), &Nat::new()), Nat::from_u64(1));
        assert_eq!(exp(&x, &Nat::new(), &Nat::from_u64(1)), Nat::new());
        assert_eq!(exp(&x, &Nat::from_u64(1), &Nat::from_u64(100)), Nat::from_u64(45));
        assert_eq!(exp(&Nat::new(), &Nat::from_u64(5), &Nat::new()), Nat::new());
    }

    #[test]
    fn small_powers() {
        let z = exp(&Nat::from_u64(3), &Nat::from_u64(40), &Nat::new());
        assert_eq!(z.to_string(), "12157665459056928801");
        let z = exp(&Nat::from_u64(2), &Nat::from_u64(100), &Nat::new());
        assert_eq!(z.to_string(), "1267650600228229401496703205376");
        let z = exp(&Nat::from_u64(4), &Nat::from_u64(13), &Nat::from_u64(497));
        assert_eq!(z, Nat::from_u64(445));
    }

    #[test]
    fn fermat_little_theorem_montgomery() {
        // 2**127 - 1 is prime, so a**(p-1) mod p == 1
        let p = nat("170141183460469231731687303715884105727");
        let mut pm1 = p.clone();
        pm1.sub_word_assign(1);
        let a = nat("98765432109876543210987654321");
        assert_eq!(exp(&a, &pm1, &p), Nat::from_u64(1));
    }

    #[test]
    fn windowed_matches_binary() {
        // even modulus takes the windowed path for multi-word exponents
        let ctx = Context::default();
        let x = nat("123456789123456789123456789");
        let y = nat("340282366920938463463374607431768211507");
        let m = nat("1000000000000000000000000000000000000000");
        let mut windowed = Nat::new();
        windowed.exp(&x, &y, &m, &ctx);
        let mut binary = Nat::new();
        binary.exp_binary(&x, &y, &m, &ctx);
        assert_eq!(windowed, binary);
    }

    #[test]
    fn montgomery_matches_binary() {
        let ctx = Context::default();
        let x = nat("987654321987654321987654321987654321");
        let y = nat("340282366920938463463374607431768211507");
        let m = nat("1000000000000000000000000000000000000007");
        let mut mont = Nat::new();
        mont.exp(&x, &y, &m, &ctx);
        let mut binary = Nat::new();
        binary.exp_binary(&x, &y, &m, &ctx);
        assert_eq!(mont, binary);
    }

    #[test]
    fn montgomery_modulus_without_top_bit() {
        let ctx = Context::default();
        let x = Nat::from_words(vec![u64::MAX, u64::MAX, 7]);
        let y = Nat::from_words(vec![3, 1]);
        let m = Nat::from_words(vec![0x1234_5679, 5]);
        let mut mont = Nat::new();
        mont.exp(&x, &y, &m, &ctx);
        let mut binary = Nat::new();
        binary.exp_binary(&x, &y, &m, &ctx);
        assert_eq!(mont, binary);
        assert!(mont < m);
    }

    #[test]
    fn sqrt_values() {
        let ctx = Context::default();
        let mut z = Nat::new();
        for (x, want) in [(0u64, 0u64), (1, 1), (2, 1), (3, 1), (4, 2), (15, 3), (16, 4), (99, 9)] {
            z.sqrt(&Nat::from_u64(x), &ctx);
            assert_eq!(z, Nat::from_u64(want), "sqrt({x})");
        }
        let x = nat("152415787532388367504942236884722755800955129");
        z.sqrt(&x, &ctx);
        assert_eq!(z.to_string(), "12345678901234567890123");
        let mut below = x.clone();
        below.sub_word_assign(1);
        z.sqrt(&below, &ctx);
        assert_eq!(z.to_string(), "12345678901234567890122");
    }
}
