//! Conversions from [`Float`] to machine numbers and [`Int`].
//!
//! Integer conversions truncate toward zero and saturate at the bounds of
//! the target type. Float conversions round to nearest even at the target
//! precision, including the denormal range. Every conversion reports the
//! [`Accuracy`] of its result relative to `self`.

use mparith_nat::{Nat, WORD_BITS};

use crate::float::{Accuracy, Float, Form};
use crate::int::Int;

/// Layout of an IEEE-754 binary interchange format.
struct Ieee {
    /// total width
    fbits: u32,
    /// explicit mantissa bits
    mbits: u32,
}

const BINARY32: Ieee = Ieee { fbits: 32, mbits: 23 };
const BINARY64: Ieee = Ieee { fbits: 64, mbits: 52 };

/// The top 64 mantissa bits.
fn msb64(m: &Nat) -> u64 {
    m.as_words().last().copied().unwrap_or(0)
}

impl Float {
    /// Truncate to `u64`.
    ///
    /// Negative values give `(0, Above)`; values past `u64::MAX` give
    /// `(u64::MAX, Below)`.
    #[must_use]
    pub fn to_u64(&self) -> (u64, Accuracy) {
        match self.form {
            Form::Zero => (0, Accuracy::Exact),
            Form::Inf if self.neg => (0, Accuracy::Above),
            Form::Inf => (u64::MAX, Accuracy::Below),
            Form::Finite => {
                if self.neg {
                    return (0, Accuracy::Above);
                }
                if self.exp <= 0 {
                    // 0 < x < 1
                    return (0, Accuracy::Below);
                }
                if self.exp <= 64 {
                    let u = msb64(&self.mant) >> (64 - self.exp as u32);
                    if self.min_prec() <= self.exp as usize {
                        return (u, Accuracy::Exact);
                    }
                    return (u, Accuracy::Below);
                }
                (u64::MAX, Accuracy::Below)
            }
        }
    }

    /// Truncate to `i64`, saturating at `i64::MIN` and `i64::MAX`.
    #[must_use]
    pub fn to_i64(&self) -> (i64, Accuracy) {
        match self.form {
            Form::Zero => (0, Accuracy::Exact),
            Form::Inf if self.neg => (i64::MIN, Accuracy::Above),
            Form::Inf => (i64::MAX, Accuracy::Below),
            Form::Finite => {
                // truncation moves toward zero
                let acc = Accuracy::from_above(self.neg);
                if self.exp <= 0 {
                    return (0, acc);
                }
                if self.exp <= 63 {
                    let u = (msb64(&self.mant) >> (64 - self.exp as u32)) as i64;
                    let i = if self.neg { -u } else { u };
                    if self.min_prec() <= self.exp as usize {
                        return (i, Accuracy::Exact);
                    }
                    return (i, acc);
                }
                if self.neg {
                    // -2^63 is the only value of this size that fits
                    if self.exp == 64 && self.min_prec() == 1 {
                        return (i64::MIN, Accuracy::Exact);
                    }
                    return (i64::MIN, acc);
                }
                (i64::MAX, Accuracy::Below)
            }
        }
    }

    /// Nearest `f64`, ties to even. Values beyond the `f64` range give
    /// ±Inf; values below half the smallest denormal give ±0.
    #[must_use]
    pub fn to_f64(&self) -> (f64, Accuracy) {
        let (bits, acc) = self.to_ieee(&BINARY64);
        (f64::from_bits(bits), acc)
    }

    /// Nearest `f32`, ties to even, with the same edge behavior as
    /// [`Float::to_f64`].
    #[must_use]
    pub fn to_f32(&self) -> (f32, Accuracy) {
        let (bits, acc) = self.to_ieee(&BINARY32);
        (f32::from_bits(bits as u32), acc)
    }

    /// The bit pattern of `self` in the format `f`, in the low `f.fbits`
    /// bits of the result.
    fn to_ieee(&self, f: &Ieee) -> (u64, Accuracy) {
        let ebits = f.fbits - f.mbits - 1;
        let bias = (1i64 << (ebits - 1)) - 1;
        let emin = 1 - bias;
        let emax = bias;

        let sign = u64::from(self.neg) << (f.fbits - 1);
        let inf = sign | (((1 << ebits) - 1) << f.mbits);

        match self.form {
            Form::Zero => return (sign, Accuracy::Exact),
            Form::Inf => return (inf, Accuracy::Exact),
            Form::Finite => {}
        }

        // exponent for a mantissa in [1, 2)
        let mut e = i64::from(self.exp) - 1;
        let mut p = i64::from(f.mbits) + 1;
        if e < emin {
            // denormal: fewer mantissa bits are available
            p = i64::from(f.mbits) + 1 - emin + e;
            if p < 0 || (p == 0 && !self.mant.sticky(self.mant.len() * WORD_BITS - 1)) {
                // at most half the smallest denormal rounds to zero
                return (sign, Accuracy::from_above(self.neg));
            }
            if p == 0 {
                // more than half rounds up to the smallest denormal
                return (sign | 1, Accuracy::from_above(!self.neg));
            }
        }

        let mut r = Float::with_prec(p as u32);
        r.set(self);
        e = i64::from(r.exp) - 1;
        if r.form == Form::Inf || e > emax {
            return (inf, Accuracy::from_above(!self.neg));
        }

        let msb = msb64(&r.mant) >> (64 - f.fbits);
        let bits = if e < emin {
            let p = i64::from(f.mbits) + 1 - emin + e;
            msb >> (i64::from(f.fbits) - p)
        } else {
            let bexp = ((e + bias) as u64) << f.mbits;
            bexp | ((msb >> ebits) & ((1 << f.mbits) - 1))
        };
        (sign | bits, r.acc)
    }

    /// Truncate to an [`Int`]. Infinities give `None`.
    #[must_use]
    pub fn to_int(&self) -> (Option<Int>, Accuracy) {
        match self.form {
            Form::Zero => (Some(Int::new()), Accuracy::Exact),
            Form::Inf => (None, Accuracy::from_above(self.neg)),
            Form::Finite => {
                let mut acc = Accuracy::from_above(self.neg);
                if self.exp <= 0 {
                    return (Some(Int::new()), acc);
                }
                let all_bits = self.mant.len() * WORD_BITS;
                let exp = self.exp as usize;
                if self.min_prec() <= exp {
                    acc = Accuracy::Exact;
                }
                let mut abs = Nat::new();
                if exp > all_bits {
                    abs.shl(&self.mant, exp - all_bits);
                } else {
                    abs.shr(&self.mant, all_bits - exp);
                }
                (Some(Int::from_parts(self.neg, abs)), acc)
            }
        }
    }
}
