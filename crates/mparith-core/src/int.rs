//! Signed multi-precision integers.
//!
//! An [`Int`] is a sign and a [`Nat`] magnitude. Zero is never negative.
//! Like [`Nat`], the methods write their result into `self`; operations
//! that need scratch space take a [`Context`].

use std::cmp::Ordering;

use mparith_nat::{Context, Nat};

/// Signed multi-precision integer.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Int {
    pub(crate) neg: bool,
    pub(crate) abs: Nat,
}

impl Int {
    /// The value zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            neg: false,
            abs: Nat::new(),
        }
    }

    /// Build from an `i64`.
    #[must_use]
    pub fn from_i64(x: i64) -> Self {
        let mut z = Self::new();
        z.set_i64(x);
        z
    }

    /// Build from a `u64`.
    #[must_use]
    pub fn from_u64(x: u64) -> Self {
        Self {
            neg: false,
            abs: Nat::from_u64(x),
        }
    }

    /// Build from a sign and a magnitude. A zero magnitude is never negative.
    #[must_use]
    pub fn from_parts(neg: bool, abs: Nat) -> Self {
        let neg = neg && !abs.is_zero();
        Self { neg, abs }
    }

    /// Split into sign and magnitude.
    #[must_use]
    pub fn into_parts(self) -> (bool, Nat) {
        (self.neg, self.abs)
    }

    /// The magnitude |self|.
    #[must_use]
    pub fn magnitude(&self) -> &Nat {
        &self.abs
    }

    /// self = x.
    pub fn set(&mut self, x: &Int) {
        self.neg = x.neg;
        self.abs.set(&x.abs);
    }

    /// self = x.
    pub fn set_i64(&mut self, x: i64) {
        self.abs.set_u64(x.unsigned_abs());
        self.neg = x < 0;
    }

    /// self = x.
    pub fn set_u64(&mut self, x: u64) {
        self.abs.set_u64(x);
        self.neg = false;
    }

    /// -1, 0 or +1 depending on the sign of `self`.
    #[must_use]
    pub fn sign(&self) -> i32 {
        if self.abs.is_zero() {
            0
        } else if self.neg {
            -1
        } else {
            1
        }
    }

    /// Whether `self` is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// Whether `self` is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.neg
    }

    /// self = |x|.
    pub fn abs(&mut self, x: &Int) {
        self.set(x);
        self.neg = false;
    }

    /// self = -x.
    pub fn neg(&mut self, x: &Int) {
        self.set(x);
        self.neg = !self.abs.is_zero() && !x.neg;
    }

    /// self = x + y.
    pub fn add(&mut self, x: &Int, y: &Int) {
        let mut neg = x.neg;
        if x.neg == y.neg {
            // x + y == x + y
            // (-x) + (-y) == -(x + y)
            self.abs.add(&x.abs, &y.abs);
        } else if x.abs >= y.abs {
            // x + (-y) == x - y
            // (-x) + y == -(x - y)
            self.abs.sub(&x.abs, &y.abs);
        } else {
            neg = !neg;
            self.abs.sub(&y.abs, &x.abs);
        }
        self.neg = neg && !self.abs.is_zero();
    }

    /// self = x - y.
    pub fn sub(&mut self, x: &Int, y: &Int) {
        let mut neg = x.neg;
        if x.neg != y.neg {
            // x - (-y) == x + y
            // (-x) - y == -(x + y)
            self.abs.add(&x.abs, &y.abs);
        } else if x.abs >= y.abs {
            self.abs.sub(&x.abs, &y.abs);
        } else {
            neg = !neg;
            self.abs.sub(&y.abs, &x.abs);
        }
        self.neg = neg && !self.abs.is_zero();
    }

    /// self = x * y.
    pub fn mul(&mut self, x: &Int, y: &Int, ctx: &Context) {
        if std::ptr::eq(x, y) {
            self.abs.sqr(&x.abs, ctx);
            self.neg = false;
            return;
        }
        self.abs.mul(&x.abs, &y.abs, ctx);
        self.neg = !self.abs.is_zero() && x.neg != y.neg;
    }

    /// self = x / y, truncated toward zero.
    ///
    /// # Panics
    ///
    /// Panics if `y` is zero.
    pub fn quo(&mut self, x: &Int, y: &Int, ctx: &Context) {
        let mut r = Nat::new();
        self.abs.div(&mut r, &x.abs, &y.abs, ctx);
        self.neg = !self.abs.is_zero() && x.neg != y.neg;
    }

    /// self = x % y, with the sign of `x`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is zero.
    pub fn rem(&mut self, x: &Int, y: &Int, ctx: &Context) {
        self.abs.rem(&x.abs, &y.abs, ctx);
        self.neg = !self.abs.is_zero() && x.neg;
    }

    /// Truncated division: self = x / y rounded toward zero and
    /// r = x - y*self, so that `r` has the sign of `x`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is zero.
    pub fn quo_rem(&mut self, r: &mut Int, x: &Int, y: &Int, ctx: &Context) {
        self.abs.div(&mut r.abs, &x.abs, &y.abs, ctx);
        self.neg = !self.abs.is_zero() && x.neg != y.neg;
        r.neg = !r.abs.is_zero() && x.neg;
    }

    /// Euclidean quotient: the `q` with `x = q*y + m` and `0 <= m < |y|`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is zero.
    pub fn div(&mut self, x: &Int, y: &Int, ctx: &Context) {
        let mut m = Int::new();
        self.div_mod(&mut m, x, y, ctx);
    }

    /// Euclidean modulus: self = x mod y with `0 <= self < |y|`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is zero.
    pub fn modulo(&mut self, x: &Int, y: &Int, ctx: &Context) {
        let mut q = Int::new();
        q.quo_rem(self, x, y, ctx);
        if self.neg {
            // |r| < |y| so one step of |y| makes it non-negative
            let mut t = Int::new();
            t.abs(y);
            *self += &t;
        }
    }

    /// Euclidean division: self = x div y and m = x mod y, so that
    /// `x = self*y + m` with `0 <= m < |y|`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is zero.
    pub fn div_mod(&mut self, m: &mut Int, x: &Int, y: &Int, ctx: &Context) {
        self.quo_rem(m, x, y, ctx);
        if m.neg {
            let one = Int::from_u64(1);
            if y.neg {
                *self += &one;
                *m -= y;
            } else {
                *self -= &one;
                *m += y;
            }
        }
    }

    /// Compare magnitudes.
    #[must_use]
    pub fn cmp_abs(&self, y: &Int) -> Ordering {
        self.abs.cmp(&y.abs)
    }

    /// self = a * (a+1) * ... * b, or 1 for an empty range.
    pub fn mul_range(&mut self, a: i64, b: i64, ctx: &Context) {
        if a > b {
            self.set_u64(1);
            return;
        }
        if a <= 0 && b >= 0 {
            // the range includes 0
            self.set_u64(0);
            return;
        }
        // a and b share a sign here; a negative range has b-a+1 factors
        let (lo, hi, neg) = if a < 0 {
            (b.unsigned_abs(), a.unsigned_abs(), b.abs_diff(a) & 1 == 0)
        } else {
            (a.unsigned_abs(), b.unsigned_abs(), false)
        };
        self.abs.mul_range(lo, hi, ctx);
        self.neg = neg;
    }

    /// self = n choose k; 0 when `k > n` and 1 when `k <= 0`.
    pub fn binomial(&mut self, n: i64, mut k: i64, ctx: &Context) {
        if k > n {
            self.set_u64(0);
            return;
        }
        if k <= 0 {
            self.set_u64(1);
            return;
        }
        // 1 <= k <= n from here on
        if k > n - k {
            k = n - k;
        }
        let mut a = Int::new();
        let mut b = Int::new();
        a.mul_range(n - (k - 1), n, ctx);
        b.mul_range(1, k, ctx);
        self.quo(&a, &b, ctx);
    }

    /// self = floor(sqrt(x)).
    ///
    /// # Panics
    ///
    /// Panics if `x` is negative.
    pub fn sqrt(&mut self, x: &Int, ctx: &Context) {
        assert!(!x.neg, "square root of negative number");
        self.neg = false;
        self.abs.sqrt(&x.abs, ctx);
    }

    /// self = a uniformly distributed value in `[0, n)`, or 0 when `n <= 0`.
    pub fn random<R: rand::Rng + ?Sized>(&mut self, rng: &mut R, n: &Int) {
        self.neg = false;
        if n.neg || n.is_zero() {
            self.abs.clear();
            return;
        }
        self.abs.random(rng, &n.abs);
    }

    /// The value as an `i64`, if it fits.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        let u = self.abs.to_u64()?;
        if self.neg {
            0i64.checked_sub_unsigned(u)
        } else {
            i64::try_from(u).ok()
        }
    }

    /// The value as a `u64`, if it fits.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        if self.neg {
            return None;
        }
        self.abs.to_u64()
    }

    /// Whether the value fits an `i64`.
    #[must_use]
    pub fn is_i64(&self) -> bool {
        self.to_i64().is_some()
    }

    /// Whether the value fits a `u64`.
    #[must_use]
    pub fn is_u64(&self) -> bool {
        self.to_u64().is_some()
    }

    /// The low 64 bits of |self|.
    #[must_use]
    pub fn low_u64(&self) -> u64 {
        self.abs.low_u64()
    }

    /// Length of |self| in bits; 0 for zero.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.abs.bit_len()
    }

    /// Number of trailing zero bits of |self|.
    #[must_use]
    pub fn trailing_zero_bits(&self) -> usize {
        self.abs.trailing_zero_bits()
    }

    /// |self| as big-endian bytes, without leading zeros.
    #[must_use]
    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.abs.to_bytes_be()
    }

    /// Set to the non-negative value of the big-endian bytes `buf`.
    pub fn set_bytes_be(&mut self, buf: &[u8]) {
        self.abs.set_bytes_be(buf);
        self.neg = false;
    }

    /// Build from big-endian bytes.
    #[must_use]
    pub fn from_bytes_be(buf: &[u8]) -> Self {
        let mut z = Self::new();
        z.set_bytes_be(buf);
        z
    }

    /// Write |self| zero-extended into `buf`, big-endian.
    ///
    /// # Panics
    ///
    /// Panics if the value does not fit.
    pub fn fill_bytes_be(&self, buf: &mut [u8]) {
        self.abs.fill_bytes_be(buf);
    }

    /// Add `y` to the magnitude-and-sign pair in place.
    fn add_signed_assign(&mut self, y: &Int, y_neg: bool) {
        if self.neg == y_neg {
            self.abs += &y.abs;
        } else if self.abs >= y.abs {
            self.abs -= &y.abs;
        } else {
            let mut t = y.abs.clone();
            t -= &self.abs;
            self.abs = t;
            self.neg = !self.neg;
        }
        self.neg = self.neg && !self.abs.is_zero();
    }
}

impl Ord for Int {
    fn cmp(&self, y: &Self) -> Ordering {
        match (self.neg, y.neg) {
            (false, false) => self.abs.cmp(&y.abs),
            (true, true) => y.abs.cmp(&self.abs),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Int {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::ops::AddAssign<&Int> for Int {
    fn add_assign(&mut self, y: &Int) {
        self.add_signed_assign(y, y.neg);
    }
}

impl std::ops::SubAssign<&Int> for Int {
    fn sub_assign(&mut self, y: &Int) {
        self.add_signed_assign(y, !y.neg);
    }
}

impl From<i64> for Int {
    fn from(x: i64) -> Self {
        Self::from_i64(x)
    }
}

impl From<u64> for Int {
    fn from(x: u64) -> Self {
        Self::from_u64(x)
    }
}

impl From<Nat> for Int {
    fn from(abs: Nat) -> Self {
        Self { neg: false, abs }
    }
}
