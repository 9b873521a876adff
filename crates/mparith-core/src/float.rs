//! Arbitrary-precision binary floating point.
//!
//! A non-zero finite [`Float`] is `±mant × 2^exp` with `0.5 <= mant < 1.0`.
//! The mantissa carries `prec` bits; every operation rounds its exact
//! result to the precision of the destination using the destination's
//! [`RoundingMode`] and records the direction of the rounding error as an
//! [`Accuracy`]. Values are zero, finite or infinite. There is no NaN: an
//! operation that would produce one returns a [`NanError`](crate::NanError).
//!
//! A destination with precision 0 takes the larger precision of the
//! operands before the operation runs; setters pick a width that holds the
//! argument exactly.

use std::fmt;

use mparith_nat::arith::{add_scalar, shl_vu_in, shr_vu_in};
use mparith_nat::{Nat, Word, WORD_BITS};
use tracing::trace;

use crate::error::NanError;
use crate::int::Int;

/// Largest supported exponent.
pub const MAX_EXP: i32 = i32::MAX;
/// Smallest supported exponent.
pub const MIN_EXP: i32 = i32::MIN;
/// Largest supported precision in bits.
pub const MAX_PREC: u32 = u32::MAX;

/// How a result is rounded to the precision of its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundingMode {
    /// Round to the nearest value; ties go to the even mantissa.
    #[default]
    ToNearestEven,
    /// Round to the nearest value; ties go away from zero.
    ToNearestAway,
    /// Truncate.
    ToZero,
    /// Round up in magnitude.
    AwayFromZero,
    /// Round toward negative infinity.
    ToNegativeInf,
    /// Round toward positive infinity.
    ToPositiveInf,
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundingMode::ToNearestEven => "ToNearestEven",
            RoundingMode::ToNearestAway => "ToNearestAway",
            RoundingMode::ToZero => "ToZero",
            RoundingMode::AwayFromZero => "AwayFromZero",
            RoundingMode::ToNegativeInf => "ToNegativeInf",
            RoundingMode::ToPositiveInf => "ToPositiveInf",
        };
        f.pad(name)
    }
}

/// Direction of the error of the most recent rounding, relative to the
/// exact result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Accuracy {
    /// The stored value is smaller than the exact one.
    Below,
    /// No rounding happened.
    #[default]
    Exact,
    /// The stored value is larger than the exact one.
    Above,
}

impl Accuracy {
    /// `Above` if the stored value moved up, else `Below`.
    pub(crate) const fn from_above(above: bool) -> Self {
        if above {
            Accuracy::Above
        } else {
            Accuracy::Below
        }
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Accuracy::Below => "Below",
            Accuracy::Exact => "Exact",
            Accuracy::Above => "Above",
        };
        f.pad(name)
    }
}

/// Ordered so that `Zero < Finite < Inf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub(crate) enum Form {
    #[default]
    Zero,
    Finite,
    Inf,
}

/// A multi-precision floating point number.
///
/// The zero value is `+0` with precision 0 in mode
/// [`RoundingMode::ToNearestEven`]. Equality and ordering compare the
/// numeric values, so `-0 == +0`.
#[derive(Clone, Default)]
pub struct Float {
    pub(crate) prec: u32,
    pub(crate) mode: RoundingMode,
    pub(crate) acc: Accuracy,
    pub(crate) form: Form,
    pub(crate) neg: bool,
    pub(crate) mant: Nat,
    pub(crate) exp: i32,
}

/// Shift `m` left until its top word has the most significant bit set.
/// Returns the shift amount.
pub(crate) fn fnorm(m: &mut Nat) -> i64 {
    let words = m.words_mut();
    let Some(&top) = words.last() else {
        return 0;
    };
    let s = top.leading_zeros();
    if s > 0 {
        let c = shl_vu_in(words, s);
        debug_assert_eq!(c, 0);
    }
    i64::from(s)
}

/// Mantissa bits for `x != 0` left-aligned in a word, with their exponent.
fn frexp_bits(x: f64) -> (u64, i32) {
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let frac = bits & ((1 << 52) - 1);
    if biased == 0 {
        // denormal: x = frac × 2^-1074
        let lz = frac.leading_zeros();
        (frac << lz, (64 - lz) as i32 - 1074)
    } else {
        (1 << 63 | frac << 11, biased - 1022)
    }
}

impl Float {
    /// `+0` with precision 0.
    #[must_use]
    pub const fn new() -> Self {
        Float {
            prec: 0,
            mode: RoundingMode::ToNearestEven,
            acc: Accuracy::Exact,
            form: Form::Zero,
            neg: false,
            mant: Nat::new(),
            exp: 0,
        }
    }

    /// `+0` with the given precision.
    #[must_use]
    pub const fn with_prec(prec: u32) -> Self {
        let mut z = Float::new();
        z.prec = prec;
        z
    }

    /// The value of `x` with precision 64.
    #[must_use]
    pub fn from_u64(x: u64) -> Self {
        let mut z = Float::new();
        z.set_u64(x);
        z
    }

    /// The value of `x` with precision 64.
    #[must_use]
    pub fn from_i64(x: i64) -> Self {
        let mut z = Float::new();
        z.set_i64(x);
        z
    }

    /// The value of `x` with precision 53.
    ///
    /// # Errors
    ///
    /// Returns [`NanError`] if `x` is NaN.
    pub fn from_f64(x: f64) -> Result<Self, NanError> {
        let mut z = Float::new();
        z.set_f64(x)?;
        Ok(z)
    }

    /// The value of `x` with precision `max(64, bit_len(x))`.
    #[must_use]
    pub fn from_int(x: &Int) -> Self {
        let mut z = Float::new();
        z.set_int(x);
        z
    }

    /// Mantissa precision in bits. Zero and infinities may have any
    /// precision, including 0.
    #[must_use]
    pub fn prec(&self) -> u32 {
        self.prec
    }

    /// Smallest precision that represents the value exactly; 0 for zero
    /// and infinities.
    #[must_use]
    pub fn min_prec(&self) -> usize {
        if self.form != Form::Finite {
            return 0;
        }
        self.mant.len() * WORD_BITS - self.mant.trailing_zero_bits()
    }

    /// Rounding mode used by operations writing to `self`.
    #[must_use]
    pub fn mode(&self) -> RoundingMode {
        self.mode
    }

    /// Accuracy of the most recent operation that produced `self`.
    #[must_use]
    pub fn acc(&self) -> Accuracy {
        self.acc
    }

    /// -1, 0 or +1; both zeros give 0.
    #[must_use]
    pub fn sign(&self) -> i32 {
        if self.form == Form::Zero {
            0
        } else if self.neg {
            -1
        } else {
            1
        }
    }

    /// Whether `self` is negative or negative zero.
    #[must_use]
    pub fn signbit(&self) -> bool {
        self.neg
    }

    /// Whether `self` is ±0.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.form == Form::Zero
    }

    /// Whether `self` is ±Inf.
    #[must_use]
    pub fn is_inf(&self) -> bool {
        self.form == Form::Inf
    }

    /// Whether `self` is finite and has no fractional part.
    #[must_use]
    pub fn is_int(&self) -> bool {
        if self.form != Form::Finite {
            return self.form == Form::Zero;
        }
        if self.exp <= 0 {
            return false;
        }
        self.prec <= self.exp.unsigned_abs() || self.min_prec() <= self.exp.unsigned_abs() as usize
    }

    /// Change the precision, rounding the value if it shrinks.
    ///
    /// Precision 0 maps a finite value to ±0 of the same sign.
    pub fn set_prec(&mut self, prec: u32) {
        self.acc = Accuracy::Exact;
        if prec == 0 {
            self.prec = 0;
            if self.form == Form::Finite {
                self.acc = Accuracy::from_above(self.neg);
                self.form = Form::Zero;
            }
            return;
        }
        let old = self.prec;
        self.prec = prec;
        if self.prec < old {
            self.round(0);
        }
    }

    /// Change the rounding mode without touching the value.
    pub fn set_mode(&mut self, mode: RoundingMode) {
        self.mode = mode;
        self.acc = Accuracy::Exact;
    }

    /// Round the mantissa to `prec` bits; `sbit` is a sticky bit for
    /// digits already dropped below the mantissa.
    pub(crate) fn round(&mut self, mut sbit: u32) {
        self.acc = Accuracy::Exact;
        if self.form != Form::Finite {
            return;
        }

        let m = self.mant.len();
        let bits = m as u64 * WORD_BITS as u64;
        let prec = u64::from(self.prec);
        if bits <= prec {
            return;
        }

        // bit r is the rounding bit, the bits below it feed the sticky bit
        let r = (bits - prec - 1) as usize;
        let rbit = self.mant.bit(r);
        if sbit == 0 && (rbit == 0 || self.mode == RoundingMode::ToNearestEven) {
            sbit = u32::from(self.mant.sticky(r));
        }

        let n = prec.div_ceil(WORD_BITS as u64) as usize;
        let words = self.mant.words_mut();
        if m > n {
            words.copy_within(m - n.., 0);
            words.truncate(n);
        }

        let ntz = (n as u64 * WORD_BITS as u64 - prec) as u32;
        let lsb: Word = 1 << ntz;

        if rbit | sbit != 0 {
            let inc = match self.mode {
                RoundingMode::ToNegativeInf => self.neg,
                RoundingMode::ToZero => false,
                RoundingMode::ToNearestEven => rbit != 0 && (sbit != 0 || words[0] & lsb != 0),
                RoundingMode::ToNearestAway => rbit != 0,
                RoundingMode::AwayFromZero => true,
                RoundingMode::ToPositiveInf => !self.neg,
            };
            self.acc = Accuracy::from_above(inc != self.neg);

            if inc && add_scalar(words, lsb) != 0 {
                // the mantissa overflowed to 1.0
                if self.exp >= MAX_EXP {
                    self.form = Form::Inf;
                    return;
                }
                self.exp += 1;
                shr_vu_in(words, 1);
                words[n - 1] |= 1 << (WORD_BITS - 1);
            }
        }

        words[0] &= !(lsb - 1);
    }

    /// Set the exponent and round, saturating to ±0 or ±Inf when `exp`
    /// leaves the supported range.
    pub(crate) fn set_exp_and_round(&mut self, exp: i64, sbit: u32) {
        if exp < i64::from(MIN_EXP) {
            self.acc = Accuracy::from_above(self.neg);
            self.form = Form::Zero;
            trace!(exp, "float underflow");
            return;
        }
        if exp > i64::from(MAX_EXP) {
            self.acc = Accuracy::from_above(!self.neg);
            self.form = Form::Inf;
            trace!(exp, "float overflow");
            return;
        }
        self.form = Form::Finite;
        self.exp = exp as i32;
        self.round(sbit);
    }

    fn set_bits64(&mut self, neg: bool, x: u64) {
        if self.prec == 0 {
            self.prec = 64;
        }
        self.acc = Accuracy::Exact;
        self.neg = neg;
        if x == 0 {
            self.form = Form::Zero;
            return;
        }
        self.form = Form::Finite;
        let s = x.leading_zeros();
        self.mant.set_u64(x << s);
        self.exp = (64 - s) as i32;
        if self.prec < 64 {
            self.round(0);
        }
    }

    /// self = x, rounded if the precision is below 64; precision 0 becomes
    /// 64.
    pub fn set_u64(&mut self, x: u64) {
        self.set_bits64(false, x);
    }

    /// self = x, rounded if the precision is below 64; precision 0 becomes
    /// 64.
    pub fn set_i64(&mut self, x: i64) {
        self.set_bits64(x < 0, x.unsigned_abs());
    }

    /// self = x, rounded if the precision is below 53; precision 0 becomes
    /// 53.
    ///
    /// # Errors
    ///
    /// Returns [`NanError`] for a NaN argument and leaves `self` at `+0`.
    pub fn set_f64(&mut self, x: f64) -> Result<(), NanError> {
        if self.prec == 0 {
            self.prec = 53;
        }
        self.acc = Accuracy::Exact;
        if x.is_nan() {
            self.form = Form::Zero;
            self.neg = false;
            return Err(NanError::new("Float from NaN"));
        }
        self.neg = x.is_sign_negative();
        if x == 0.0 {
            self.form = Form::Zero;
            return Ok(());
        }
        if x.is_infinite() {
            self.form = Form::Inf;
            return Ok(());
        }
        self.form = Form::Finite;
        let (mant, exp) = frexp_bits(x);
        self.mant.set_u64(mant);
        self.exp = exp;
        if self.prec < 53 {
            self.round(0);
        }
        Ok(())
    }

    /// self = x, rounded to the precision of `self`; precision 0 becomes
    /// `max(64, bit_len(x))`.
    pub fn set_int(&mut self, x: &Int) {
        let bits = x.bit_len() as u32;
        if self.prec == 0 {
            self.prec = bits.max(64);
        }
        self.acc = Accuracy::Exact;
        self.neg = x.is_negative();
        if bits == 0 {
            self.form = Form::Zero;
            return;
        }
        self.mant.set(x.magnitude());
        fnorm(&mut self.mant);
        self.set_exp_and_round(i64::from(bits), 0);
    }

    /// self = ±Inf, negative if `signbit` is set. The precision is kept.
    pub fn set_inf(&mut self, signbit: bool) {
        self.acc = Accuracy::Exact;
        self.form = Form::Inf;
        self.neg = signbit;
    }

    /// self = x rounded to the precision of `self`; a precision of 0 takes
    /// the precision of `x`.
    pub fn set(&mut self, x: &Float) {
        self.acc = Accuracy::Exact;
        self.form = x.form;
        self.neg = x.neg;
        if x.form == Form::Finite {
            self.exp = x.exp;
            self.mant.set(&x.mant);
        }
        if self.prec == 0 {
            self.prec = x.prec;
        } else if self.prec < x.prec {
            self.round(0);
        }
    }

    /// Copy `x` including its precision, mode and accuracy.
    pub fn copy_from(&mut self, x: &Float) {
        self.prec = x.prec;
        self.mode = x.mode;
        self.acc = x.acc;
        self.form = x.form;
        self.neg = x.neg;
        if self.form == Form::Finite {
            self.mant.set(&x.mant);
            self.exp = x.exp;
        }
    }

    /// Split `self` into `mant × 2^exp` with `0.5 <= |mant| < 1.0` and
    /// return `exp`. When given, `mant` receives the mantissa with the
    /// precision and mode of `self`. Zero and infinities give exponent 0
    /// and are copied unchanged.
    pub fn mant_exp(&self, mant: Option<&mut Float>) -> i32 {
        let exp = if self.form == Form::Finite { self.exp } else { 0 };
        if let Some(mant) = mant {
            mant.copy_from(self);
            if mant.form == Form::Finite {
                mant.exp = 0;
            }
        }
        exp
    }

    /// self = mant × 2^exp with the precision and mode of `mant`.
    ///
    /// Overflow gives ±Inf and underflow gives ±0.
    pub fn set_mant_exp(&mut self, mant: &Float, exp: i32) {
        self.copy_from(mant);
        if self.form == Form::Finite {
            self.set_exp_and_round(i64::from(self.exp) + i64::from(exp), 0);
        }
    }

    /// self = |x| rounded to the precision of `self`.
    pub fn abs(&mut self, x: &Float) {
        self.set(x);
        self.neg = false;
    }

    /// self = -x rounded to the precision of `self`.
    pub fn neg(&mut self, x: &Float) {
        self.set(x);
        self.neg = !self.neg;
    }

    /// Check the representation invariants in debug builds.
    pub(crate) fn debug_validate(&self) {
        if self.form != Form::Finite {
            return;
        }
        debug_assert!(!self.mant.is_zero(), "finite float with empty mantissa");
        debug_assert!(
            self.mant.as_words().last().is_some_and(|&w| w >> (WORD_BITS - 1) == 1),
            "mantissa not normalized"
        );
        debug_assert!(self.prec > 0, "finite float with zero precision");
    }
}
