//! Modular arithmetic on [`Int`]: exponentiation, inverses, the Jacobi
//! symbol and square roots modulo a prime.
//!
//! Operations without a solution for their input return `None`.

use mparith_nat::{Context, Nat};

use crate::int::Int;

impl Int {
    /// `self**y mod |m|`, or `self**y` when `m` is `None` or zero.
    ///
    /// A negative exponent uses the inverse of `self` modulo `m`; the result
    /// is `None` when that inverse does not exist. Without a modulus a
    /// negative exponent yields 1. The sign of the result follows the base
    /// actually exponentiated, and with a modulus it is reduced into `[0, |m|)`.
    #[must_use]
    pub fn exp(&self, y: &Int, m: Option<&Int>, ctx: &Context) -> Option<Int> {
        let m = m.filter(|m| !m.is_zero());
        let inverse;
        let base = if y.neg {
            let Some(m) = m else {
                return Some(Int::from_u64(1));
            };
            // x**y mod m == (x**-1)**|y| mod m
            inverse = self.mod_inverse(m, ctx)?;
            &inverse
        } else {
            self
        };

        let zero = Nat::new();
        let m_abs = m.map_or(&zero, |m| &m.abs);

        let mut z = Int::new();
        z.abs.exp(&base.abs, &y.abs, m_abs, ctx);
        z.neg = !z.abs.is_zero() && base.neg && y.abs.bit(0) == 1;
        if z.neg && !m_abs.is_zero() {
            // bring x**y mod |m| into [0, |m|)
            let t = std::mem::take(&mut z.abs);
            z.abs.sub(m_abs, &t);
            z.neg = false;
        }
        Some(z)
    }

    /// The inverse of `self` in the ring of integers modulo `n`: the `z` in
    /// `[0, |n|)` with `self*z == 1 (mod n)`.
    ///
    /// Returns `None` when `self` and `n` are not relatively prime.
    #[must_use]
    pub fn mod_inverse(&self, n: &Int, ctx: &Context) -> Option<Int> {
        let mut n_abs = Int::new();
        n_abs.abs(n);
        let mut g = Int::new();
        if self.neg {
            g.modulo(self, &n_abs, ctx);
        } else {
            g.set(self);
        }

        let (mut d, mut x) = (Int::new(), Int::new());
        d.gcd_with(Some(&mut x), None, &g, &n_abs, ctx);

        // g and n are relatively prime exactly when d == 1
        if d != Int::from_u64(1) {
            return None;
        }
        if x.neg {
            x += &n_abs;
        }
        Some(x)
    }

    /// The Jacobi symbol `(x/y)`: +1, -1 or 0.
    ///
    /// # Panics
    ///
    /// Panics unless `y` is odd. Zero is not odd.
    #[must_use]
    pub fn jacobi(x: &Int, y: &Int, ctx: &Context) -> i32 {
        assert!(
            y.abs.bit(0) == 1,
            "invalid second argument to jacobi: need odd integer but got {y}"
        );

        // "The Yacas Book of Algorithms", chapter 2, section 2.4
        let mut a = x.clone();
        let mut b = y.clone();
        let mut c = Int::new();
        let mut j = 1;

        if b.neg {
            if a.neg {
                j = -1;
            }
            b.neg = false;
        }

        let one = Nat::from_u64(1);
        loop {
            if b.abs == one {
                return j;
            }
            if a.is_zero() {
                return 0;
            }
            let t = std::mem::take(&mut a);
            a.modulo(&t, &b, ctx);
            if a.is_zero() {
                return 0;
            }

            // factors of two in a
            let s = a.abs.trailing_zero_bits();
            if s & 1 != 0 {
                let bmod8 = b.abs.low_u64() & 7;
                if bmod8 == 3 || bmod8 == 5 {
                    j = -j;
                }
            }
            c.abs.shr(&a.abs, s);

            // reciprocity
            if b.abs.low_u64() & 3 == 3 && c.abs.low_u64() & 3 == 3 {
                j = -j;
            }
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut b, &mut c);
        }
    }

    /// A square root of `self` modulo the odd prime `p`.
    ///
    /// Returns `None` when `self` is not a square mod `p`. Primality of `p`
    /// is not checked; for a composite modulus the result is meaningless.
    ///
    /// # Panics
    ///
    /// Panics if `p` is not odd.
    #[must_use]
    pub fn mod_sqrt(&self, p: &Int, ctx: &Context) -> Option<Int> {
        match Int::jacobi(self, p, ctx) {
            -1 => return None,
            0 => return Some(Int::new()),
            _ => {}
        }
        let mut x = Int::new();
        if self.neg || *self >= *p {
            x.modulo(self, p, ctx);
        } else {
            x.set(self);
        }

        let low = p.abs.low_u64();
        let root = if low % 4 == 3 {
            sqrt_3_mod_4(&x, p, ctx)
        } else if low % 8 == 5 {
            sqrt_5_mod_8(&x, p, ctx)
        } else {
            tonelli_shanks(&x, p, ctx)
        };
        Some(root)
    }
}

/// x**e mod p for a non-negative exponent and a positive modulus.
fn pow_mod(x: &Int, e: &Int, p: &Int, ctx: &Context) -> Int {
    let mut z = Int::new();
    z.abs.exp(&x.abs, &e.abs, &p.abs, ctx);
    z
}

/// z = x*y mod p for x, y in [0, p).
fn mul_mod(x: &Int, y: &Int, p: &Int, ctx: &Context) -> Int {
    let mut t = Int::new();
    t.mul(x, y, ctx);
    let mut z = Int::new();
    z.modulo(&t, p, ctx);
    z
}

/// For p == 3 mod 4, `(x**((p+1)/4))**2 == x**((p+1)/2) == x` mod p.
fn sqrt_3_mod_4(x: &Int, p: &Int, ctx: &Context) -> Int {
    let mut e = Int::new();
    e.add(p, &Int::from_u64(1));
    e.abs.shr_assign(2);
    pow_mod(x, &e, p, ctx)
}

/// Atkin's method for p == 5 mod 8, where 2 is a non-square:
/// `alpha = (2x)**((p-5)/8)`, `beta = 2x*alpha**2` is a square root of -1,
/// and `x*alpha*(beta-1)` is a square root of x.
fn sqrt_5_mod_8(x: &Int, p: &Int, ctx: &Context) -> Int {
    // p = 8e + 5
    let mut e = Int::new();
    e.abs.shr(&p.abs, 3);
    let mut tx = Int::new();
    tx.abs.shl(&x.abs, 1);

    let alpha = pow_mod(&tx, &e, p, ctx);
    let beta = mul_mod(&alpha, &alpha, p, ctx);
    let mut beta = mul_mod(&beta, &tx, p, ctx);
    beta -= &Int::from_u64(1);
    let beta = mul_mod(&beta, x, p, ctx);
    mul_mod(&beta, &alpha, p, ctx)
}

/// Tonelli-Shanks for any odd prime, after section 6 of Ezra Brown,
/// "Square roots from 1; 24, 51, 10 to Dan Shanks".
fn tonelli_shanks(x: &Int, p: &Int, ctx: &Context) -> Int {
    // p - 1 = s * 2**e with s odd
    let mut s = Int::new();
    s.sub(p, &Int::from_u64(1));
    let e = s.abs.trailing_zero_bits();
    s.abs.shr_assign(e);

    // some non-square n
    let mut n = Int::from_u64(2);
    while Int::jacobi(&n, p, ctx) != -1 {
        n += &Int::from_u64(1);
    }

    let one = Int::from_u64(1);
    let mut half = Int::new();
    half.add(&s, &one);
    half.abs.shr_assign(1);
    let mut y = pow_mod(x, &half, p, ctx); // x**((s+1)/2)
    let mut b = pow_mod(x, &s, p, ctx); // x**s
    let mut g = pow_mod(&n, &s, p, ctx); // n**s
    let mut r = e;
    loop {
        // least m with ord_p(b) == 2**m
        let mut m = 0;
        let mut t = b.clone();
        while t != one {
            t = mul_mod(&t, &t, p, ctx);
            m += 1;
        }
        if m == 0 {
            return y;
        }

        // t = g**(2**(r-m-1))
        let mut k = Int::new();
        k.abs.shl(&one.abs, r - m - 1);
        let t = pow_mod(&g, &k, p, ctx);
        g = mul_mod(&t, &t, p, ctx);
        y = mul_mod(&y, &t, p, ctx);
        b = mul_mod(&b, &g, p, ctx);
        r = m;
    }
}
