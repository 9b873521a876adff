//! Text parsing for [`Float`].
//!
//! Accepted syntax:
//!
//! ```text
//! number   = [ sign ] ( mantissa [ exponent ] | "Inf" | "inf" ) .
//! sign     = "+" | "-" .
//! mantissa = [ prefix ] digits [ "." [ digits ] ] | [ prefix ] "." digits .
//! prefix   = "0" ( "b" | "B" | "o" | "O" | "x" | "X" ) .
//! exponent = ( "e" | "E" | "p" | "P" ) [ sign ] decimals .
//! ```
//!
//! A prefix and `_` separators between digits are only accepted with base
//! 0. An `e` exponent scales by a power of ten and a `p` exponent by a
//! power of two; in hexadecimal the letter `e` is a digit, so only `p`
//! applies there.

use std::str::FromStr;

use mparith_nat::{Context, ScanError, Scanner, WORD_BITS};

use crate::error::ParseError;
use crate::float::{fnorm, Accuracy, Float, Form, RoundingMode, MAX_EXP, MIN_EXP};
use crate::int_conv::{expect_end, scan_sign};

/// Scan an optional exponent. Returns the exponent and its base, 10 for
/// `e` and 2 for `p`; without an exponent the result is `(0, 10)`.
fn scan_exponent(r: &mut Scanner<'_>, base2_ok: bool, sep_ok: bool) -> Result<(i64, u32), ParseError> {
    let base = match r.read_byte() {
        None => return Ok((0, 10)),
        Some(b'e' | b'E') => 10,
        Some(b'p' | b'P') if base2_ok => 2,
        Some(_) => {
            r.unread_byte();
            return Ok((0, 10));
        }
    };

    let mut ch = r.read_byte();
    let mut neg = false;
    if let Some(c @ (b'+' | b'-')) = ch {
        neg = c == b'-';
        ch = r.read_byte();
    }

    // b'0' after a digit, b'_' after a separator, b'.' at the start
    let mut prev = b'.';
    let mut inval_sep = false;
    let mut has_digits = false;
    let mut exp: Option<i64> = Some(0);

    while let Some(c) = ch {
        match c {
            b'0'..=b'9' => {
                exp = exp
                    .and_then(|e| e.checked_mul(10))
                    .and_then(|e| e.checked_add(i64::from(c - b'0')));
                prev = b'0';
                has_digits = true;
            }
            b'_' if sep_ok => {
                if prev != b'0' {
                    inval_sep = true;
                }
                prev = b'_';
            }
            _ => {
                r.unread_byte();
                break;
            }
        }
        ch = r.read_byte();
    }

    if !has_digits {
        return Err(ScanError::NoDigits.into());
    }
    let exp = exp.ok_or(ParseError::ExponentOutOfRange)?;
    if inval_sep || prev == b'_' {
        return Err(ScanError::InvalidSeparator.into());
    }
    Ok((if neg { -exp } else { exp }, base))
}

/// self = 5^n, computed with the precision of `self`.
fn pow5(z: &mut Float, n: u64, ctx: &Context) {
    // 5^27 is the largest power of five that fits in a word
    const M: u64 = 27;
    if n <= M {
        z.set_u64(5u64.pow(n as u32));
        return;
    }
    z.set_u64(5u64.pow(M as u32));
    let mut n = n - M;

    // the running square carries extra bits
    let mut f = Float::with_prec(z.prec.saturating_add(64));
    f.set_u64(5);
    while n > 0 {
        if n & 1 != 0 {
            let t = z.clone();
            z.umul(&t, &f, ctx);
        }
        let t = f.clone();
        f.umul(&t, &t, ctx);
        n >>= 1;
    }
}

impl Float {
    /// Scan a finite number from `r` and return the mantissa base.
    ///
    /// The mantissa is read exactly. Digits after the radix point and a
    /// decimal exponent become a power of five that is applied with one
    /// final rounding.
    pub(crate) fn scan(&mut self, r: &mut Scanner<'_>, base: u32, ctx: &Context) -> Result<u32, ParseError> {
        let prec = if self.prec == 0 { 64 } else { self.prec };
        self.form = Form::Zero;

        self.neg = scan_sign(r)?;
        let (b, fcount) = self.mant.scan(r, base, true)?;
        let (exp, ebase) = scan_exponent(r, true, base == 0)?;

        if self.mant.is_zero() {
            self.prec = prec;
            self.acc = Accuracy::Exact;
            return Ok(b);
        }

        // the value is mant × b^fcount × ebase^exp
        let mut exp2 = (self.mant.len() * WORD_BITS) as i64 - fnorm(&mut self.mant);
        let mut exp5 = 0i64;

        if fcount < 0 {
            let d = fcount as i64;
            match b {
                10 => {
                    exp5 = d;
                    exp2 += d;
                }
                2 => exp2 += d,
                8 => exp2 += 3 * d,
                16 => exp2 += 4 * d,
                _ => return Err(ParseError::InvalidBase(b)),
            }
        }

        let overflow = || ParseError::ExponentOverflow;
        if ebase == 10 {
            exp5 = exp5.checked_add(exp).ok_or_else(overflow)?;
        }
        exp2 = exp2.checked_add(exp).ok_or_else(overflow)?;

        if exp2 < i64::from(MIN_EXP) || exp2 > i64::from(MAX_EXP) {
            return Err(ParseError::ExponentOverflow);
        }
        self.prec = prec;
        self.form = Form::Finite;
        self.exp = exp2 as i32;

        if exp5 == 0 {
            self.round(0);
            return Ok(b);
        }

        let mut p = Float::with_prec(self.prec.saturating_add(64));
        pow5(&mut p, exp5.unsigned_abs(), ctx);
        let t = self.clone();
        if exp5 < 0 {
            self.uquo(&t, &p, ctx);
        } else {
            self.umul(&t, &p, ctx);
        }
        self.debug_validate();
        Ok(b)
    }

    /// Parse `s` into `self` and return the base of the mantissa.
    ///
    /// `base` is 0, 2, 8, 10 or 16. With base 0 the mantissa prefix picks
    /// the base, defaulting to 10, and `_` may separate digits. The result
    /// is rounded to the precision and mode of `self`; precision 0 becomes
    /// 64. `"Inf"` and `"inf"` with an optional sign give infinities and
    /// report base 0. After an error the value of `self` is unspecified.
    pub fn parse(&mut self, s: &str, base: u32, ctx: &Context) -> Result<u32, ParseError> {
        if !matches!(base, 0 | 2 | 8 | 10 | 16) {
            return Err(ParseError::InvalidBase(base));
        }

        // the scanner does not know about infinities
        let (signbit, body) = match s.as_bytes() {
            [b'-', rest @ ..] => (true, rest),
            [b'+', rest @ ..] => (false, rest),
            all => (false, all),
        };
        if body == b"Inf" || body == b"inf" {
            self.set_inf(signbit);
            return Ok(0);
        }

        let mut r = Scanner::new(s);
        let b = self.scan(&mut r, base, ctx)?;
        expect_end(s, &r)?;
        Ok(b)
    }

    /// Parse `s` into a new [`Float`] with the given precision and
    /// rounding mode. See [`Float::parse`].
    pub fn parse_float(
        s: &str,
        base: u32,
        prec: u32,
        mode: RoundingMode,
        ctx: &Context,
    ) -> Result<(Float, u32), ParseError> {
        let mut z = Float::with_prec(prec);
        z.set_mode(mode);
        let b = z.parse(s, base, ctx)?;
        Ok((z, b))
    }
}

impl FromStr for Float {
    type Err = ParseError;

    /// Parse with base 0 and precision 64.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut z = Float::new();
        z.parse(s, 0, &Context::default())?;
        Ok(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse53(s: &str) -> Float {
        Float::parse_float(s, 0, 53, RoundingMode::ToNearestEven, &Context::default())
            .unwrap()
            .0
    }

    #[test]
    fn hex_float_is_exact() {
        let x: Float = "0x1.8p1".parse().unwrap();
        assert_eq!(x, Float::from_f64(3.0).unwrap());
        assert_eq!(x.acc(), Accuracy::Exact);
        assert_eq!(x.prec(), 64);
        assert_eq!("-0x.1p-4".parse::<Float>().unwrap().to_f64().0, -0.003_906_25);
        assert_eq!("1p10".parse::<Float>().unwrap().to_f64().0, 1024.0);
    }

    #[test]
    fn decimal_matches_f64_parsing() {
        let inputs = [
            "0",
            "1",
            "-1.5",
            "0.1",
            "3.14159",
            "1e23",
            "1E-5",
            "4.35679e-10",
            "9007199254740993",
            "123456789012345678901234567890",
            ".5",
            "5.",
            "+12.5e+3",
        ];
        for s in inputs {
            let want: f64 = s.parse().unwrap();
            let got = parse53(s).to_f64();
            assert_eq!(got, (want, Accuracy::Exact), "{s}");
        }
    }

    #[test]
    fn other_bases() {
        let ctx = Context::default();
        let cases = [("0.1", 2, 0.5), ("10.4", 8, 8.5), ("ff.8", 16, 255.5), ("-1e1", 10, -10.0)];
        for (s, base, want) in cases {
            let mut z = Float::new();
            assert_eq!(z.parse(s, base, &ctx), Ok(base), "{s}");
            assert_eq!(z.to_f64().0, want, "{s}");
        }

        let mut z = Float::new();
        assert_eq!(z.parse("0b1.1", 0, &ctx), Ok(2));
        assert_eq!(z.to_f64().0, 1.5);
        assert_eq!(z.parse("1_000.25", 0, &ctx), Ok(10));
        assert_eq!(z.to_f64().0, 1000.25);
        assert_eq!(z.parse("0.1", 3, &ctx), Err(ParseError::InvalidBase(3)));
    }

    #[test]
    fn infinities_and_zero() {
        for (s, neg) in [("Inf", false), ("inf", false), ("+Inf", false), ("-inf", true)] {
            let x: Float = s.parse().unwrap();
            assert!(x.is_inf(), "{s}");
            assert_eq!(x.signbit(), neg, "{s}");
        }
        let z: Float = "-0.000e10".parse().unwrap();
        assert!(z.is_zero() && z.signbit());
        assert_eq!(z.prec(), 64);
        assert!("INF".parse::<Float>().is_err());
    }

    #[test]
    fn tiny_and_huge_exponents() {
        let x: Float = "1e-400".parse().unwrap();
        assert_eq!(x.sign(), 1);
        assert_eq!(x.to_f64(), (0.0, Accuracy::Below));
        let y: Float = "-2.5e400".parse().unwrap();
        assert_eq!(y.to_f64(), (f64::NEG_INFINITY, Accuracy::Below));
        assert_eq!(x.mant_exp(None), -1328);
    }

    #[test]
    fn errors() {
        let cases = [
            ("", ParseError::Empty),
            ("-", ParseError::Scan(ScanError::NoDigits)),
            ("1e", ParseError::Scan(ScanError::NoDigits)),
            ("1e+", ParseError::Scan(ScanError::NoDigits)),
            ("1.5x", ParseError::TrailingInput { found: 'x' }),
            ("1.5 ", ParseError::TrailingInput { found: ' ' }),
            ("1_", ParseError::Scan(ScanError::InvalidSeparator)),
            ("1e1_", ParseError::Scan(ScanError::InvalidSeparator)),
            ("1e99999999999999999999", ParseError::ExponentOutOfRange),
            ("1p2147483647", ParseError::ExponentOverflow),
        ];
        for (s, want) in cases {
            assert_eq!(s.parse::<Float>().unwrap_err(), want, "{s:?}");
        }
    }

    #[test]
    fn rounding_mode_applies() {
        let ctx = Context::default();
        let (down, _) = Float::parse_float("0.1", 10, 24, RoundingMode::ToZero, &ctx).unwrap();
        let (up, _) = Float::parse_float("0.1", 10, 24, RoundingMode::AwayFromZero, &ctx).unwrap();
        assert_eq!(down.acc(), Accuracy::Below);
        assert_eq!(up.acc(), Accuracy::Above);
        assert_eq!(down.to_f32().0, 0.099_999_994);
        assert_eq!(up.to_f32().0, 0.1);
        assert!(down < up);
    }
}
