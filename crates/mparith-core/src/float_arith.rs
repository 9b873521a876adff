//! Rounded arithmetic and comparison on [`Float`].
//!
//! The `u*` helpers work on the magnitudes of finite operands and compute
//! the exact result before rounding it once to the destination. The
//! public operations dispatch on the operand forms and return a
//! [`NanError`] where IEEE-754 would produce NaN.

use std::cmp::Ordering;

use mparith_nat::{Context, Nat, WORD_BITS};

use crate::error::NanError;
use crate::float::{fnorm, Accuracy, Float, Form, RoundingMode};

/// Exponent of the least significant mantissa bit.
fn lsb_exp(x: &Float) -> i64 {
    i64::from(x.exp) - (x.mant.len() * WORD_BITS) as i64
}

impl Float {
    /// self = |x| + |y|; both finite.
    pub(crate) fn uadd(&mut self, x: &Float, y: &Float) {
        let mut ex = lsb_exp(x);
        let ey = lsb_exp(y);

        // align the operand with the larger lsb exponent to the other one
        let mut t = Nat::new();
        match ex.cmp(&ey) {
            Ordering::Less => {
                t.shl(&y.mant, (ey - ex) as usize);
                self.mant.add(&x.mant, &t);
            }
            Ordering::Greater => {
                t.shl(&x.mant, (ex - ey) as usize);
                self.mant.add(&t, &y.mant);
                ex = ey;
            }
            Ordering::Equal => self.mant.add(&x.mant, &y.mant),
        }

        let len = (self.mant.len() * WORD_BITS) as i64;
        let s = fnorm(&mut self.mant);
        self.set_exp_and_round(ex + len - s, 0);
    }

    /// self = |x| - |y|; both finite and |x| > |y|.
    pub(crate) fn usub(&mut self, x: &Float, y: &Float) {
        let mut ex = lsb_exp(x);
        let ey = lsb_exp(y);

        let mut t = Nat::new();
        match ex.cmp(&ey) {
            Ordering::Less => {
                t.shl(&y.mant, (ey - ex) as usize);
                self.mant.sub(&x.mant, &t);
            }
            Ordering::Greater => {
                t.shl(&x.mant, (ex - ey) as usize);
                self.mant.sub(&t, &y.mant);
                ex = ey;
            }
            Ordering::Equal => self.mant.sub(&x.mant, &y.mant),
        }

        if self.mant.is_zero() {
            self.acc = Accuracy::Exact;
            self.form = Form::Zero;
            self.neg = false;
            return;
        }

        let len = (self.mant.len() * WORD_BITS) as i64;
        let s = fnorm(&mut self.mant);
        self.set_exp_and_round(ex + len - s, 0);
    }

    /// self = |x| * |y|; both finite.
    pub(crate) fn umul(&mut self, x: &Float, y: &Float, ctx: &Context) {
        let e = i64::from(x.exp) + i64::from(y.exp);
        if std::ptr::eq(x, y) {
            self.mant.sqr(&x.mant, ctx);
        } else {
            self.mant.mul(&x.mant, &y.mant, ctx);
        }
        let s = fnorm(&mut self.mant);
        self.set_exp_and_round(e - s, 0);
    }

    /// self = |x| / |y|; both finite.
    pub(crate) fn uquo(&mut self, x: &Float, y: &Float, ctx: &Context) {
        // the quotient needs prec+1 bits plus a word for the rounding bit
        let n = (self.prec as usize) / WORD_BITS + 1;

        // pad x with low zero words so the quotient gets n words
        let d = n as i64 - x.mant.len() as i64 + y.mant.len() as i64;
        let padded;
        let xadj = if d > 0 {
            let mut words = vec![0; d as usize];
            words.extend_from_slice(x.mant.as_words());
            padded = Nat::from_words(words);
            &padded
        } else {
            &x.mant
        };
        let d = xadj.len() - y.mant.len();

        let mut r = Nat::new();
        self.mant.div(&mut r, xadj, &y.mant, ctx);
        let e = i64::from(x.exp) - i64::from(y.exp) - (d as i64 - self.mant.len() as i64) * WORD_BITS as i64;

        // a non-zero remainder acts as the sticky bit
        let sbit = u32::from(!r.is_zero());
        let s = fnorm(&mut self.mant);
        self.set_exp_and_round(e - s, sbit);
    }

    /// Compare |x| and |y|; both finite.
    pub(crate) fn ucmp(x: &Float, y: &Float) -> Ordering {
        if x.exp != y.exp {
            return x.exp.cmp(&y.exp);
        }
        let (xm, ym) = (x.mant.as_words(), y.mant.as_words());
        let (mut i, mut j) = (xm.len(), ym.len());
        while i > 0 || j > 0 {
            let xw = if i > 0 {
                i -= 1;
                xm[i]
            } else {
                0
            };
            let yw = if j > 0 {
                j -= 1;
                ym[j]
            } else {
                0
            };
            if xw != yw {
                return xw.cmp(&yw);
            }
        }
        Ordering::Equal
    }

    /// -2 for -Inf, -1 for negative finite, 0 for ±0, 1 and 2 likewise.
    fn ord(&self) -> i32 {
        let m = match self.form {
            Form::Zero => return 0,
            Form::Finite => 1,
            Form::Inf => 2,
        };
        if self.neg {
            -m
        } else {
            m
        }
    }

    fn take_prec(&mut self, x: &Float, y: &Float) {
        if self.prec == 0 {
            self.prec = x.prec.max(y.prec);
        }
    }

    fn set_nan(&mut self, msg: &'static str) -> Result<(), NanError> {
        self.acc = Accuracy::Exact;
        self.form = Form::Zero;
        self.neg = false;
        Err(NanError::new(msg))
    }

    /// IEEE-754 gives -0 for an exact zero sum only when rounding toward
    /// negative infinity.
    fn fix_zero_sign(&mut self) {
        if self.form == Form::Zero && self.mode == RoundingMode::ToNegativeInf && self.acc == Accuracy::Exact {
            self.neg = true;
        }
    }

    /// self = x + y, rounded to the precision and mode of `self`.
    ///
    /// # Errors
    ///
    /// Fails for infinities with opposite signs; `self` is then `+0`.
    pub fn add(&mut self, x: &Float, y: &Float) -> Result<(), NanError> {
        self.take_prec(x, y);

        if x.form == Form::Finite && y.form == Form::Finite {
            self.neg = x.neg;
            if x.neg == y.neg {
                self.uadd(x, y);
            } else if Float::ucmp(x, y) == Ordering::Greater {
                self.usub(x, y);
            } else {
                self.neg = !self.neg;
                self.usub(y, x);
            }
            self.fix_zero_sign();
            self.debug_validate();
            return Ok(());
        }

        if x.form == Form::Inf && y.form == Form::Inf && x.neg != y.neg {
            return self.set_nan("addition of infinities with opposite signs");
        }

        if x.form == Form::Zero && y.form == Form::Zero {
            self.acc = Accuracy::Exact;
            self.form = Form::Zero;
            self.neg = x.neg && y.neg;
            return Ok(());
        }

        if x.form == Form::Inf || y.form == Form::Zero {
            self.set(x);
        } else {
            self.set(y);
        }
        Ok(())
    }

    /// self = x - y, rounded to the precision and mode of `self`.
    ///
    /// # Errors
    ///
    /// Fails for infinities with equal signs; `self` is then `+0`.
    pub fn sub(&mut self, x: &Float, y: &Float) -> Result<(), NanError> {
        self.take_prec(x, y);

        if x.form == Form::Finite && y.form == Form::Finite {
            self.neg = x.neg;
            if x.neg != y.neg {
                self.uadd(x, y);
            } else if Float::ucmp(x, y) == Ordering::Greater {
                self.usub(x, y);
            } else {
                self.neg = !self.neg;
                self.usub(y, x);
            }
            self.fix_zero_sign();
            self.debug_validate();
            return Ok(());
        }

        if x.form == Form::Inf && y.form == Form::Inf && x.neg == y.neg {
            return self.set_nan("subtraction of infinities with equal signs");
        }

        if x.form == Form::Zero && y.form == Form::Zero {
            self.acc = Accuracy::Exact;
            self.form = Form::Zero;
            self.neg = x.neg && !y.neg;
            return Ok(());
        }

        if x.form == Form::Inf || y.form == Form::Zero {
            self.set(x);
        } else {
            Float::neg(self, y);
        }
        Ok(())
    }

    /// self = x * y, rounded to the precision and mode of `self`.
    ///
    /// # Errors
    ///
    /// Fails for zero times infinity; `self` is then `+0`.
    pub fn mul(&mut self, x: &Float, y: &Float, ctx: &Context) -> Result<(), NanError> {
        self.take_prec(x, y);
        self.neg = x.neg != y.neg;

        if x.form == Form::Finite && y.form == Form::Finite {
            self.umul(x, y, ctx);
            self.debug_validate();
            return Ok(());
        }

        self.acc = Accuracy::Exact;
        if (x.form == Form::Zero && y.form == Form::Inf) || (x.form == Form::Inf && y.form == Form::Zero) {
            return self.set_nan("multiplication of zero with infinity");
        }

        self.form = if x.form == Form::Inf || y.form == Form::Inf {
            Form::Inf
        } else {
            Form::Zero
        };
        Ok(())
    }

    /// self = x / y, rounded to the precision and mode of `self`. A finite
    /// value divided by zero is ±Inf.
    ///
    /// # Errors
    ///
    /// Fails for `0 / 0` and `Inf / Inf`; `self` is then `+0`.
    pub fn quo(&mut self, x: &Float, y: &Float, ctx: &Context) -> Result<(), NanError> {
        self.take_prec(x, y);
        self.neg = x.neg != y.neg;

        if x.form == Form::Finite && y.form == Form::Finite {
            self.uquo(x, y, ctx);
            self.debug_validate();
            return Ok(());
        }

        self.acc = Accuracy::Exact;
        if (x.form == Form::Zero && y.form == Form::Zero) || (x.form == Form::Inf && y.form == Form::Inf) {
            return self.set_nan("division of zero by zero or infinity by infinity");
        }

        self.form = if x.form == Form::Zero || y.form == Form::Inf {
            Form::Zero
        } else {
            Form::Inf
        };
        Ok(())
    }
}

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Float {}

impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Float {
    /// Numeric order; `-Inf < finite < +Inf` and the zeros are equal.
    fn cmp(&self, other: &Self) -> Ordering {
        let (mx, my) = (self.ord(), other.ord());
        if mx != my {
            return mx.cmp(&my);
        }
        match mx {
            -1 => Float::ucmp(other, self),
            1 => Float::ucmp(self, other),
            _ => Ordering::Equal,
        }
    }
}
