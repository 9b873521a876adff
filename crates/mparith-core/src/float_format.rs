//! Text formatting for [`Float`].
//!
//! The format characters follow the `printf` float verbs:
//!
//! | fmt        | output                                                    |
//! |------------|-----------------------------------------------------------|
//! | `e`, `E`   | `-d.dddde±dd`, decimal exponent                           |
//! | `f`        | `-ddddd.dddd`, no exponent                                |
//! | `g`, `G`   | `e`/`E` for large exponents, `f` otherwise                |
//! | `x`        | `-0x1.hhhhp±dd`, hex mantissa in `[1, 2)`                 |
//! | `p`        | `-0x.hhhhp±dd`, hex mantissa in `[0.5, 1)`                |
//! | `b`        | `-ddddp±dd`, decimal integer mantissa of exactly `prec` bits |
//!
//! For the decimal formats the precision is the number of digits after the
//! point (`e`, `f`) or the number of significant digits (`g`). A negative
//! precision selects the fewest digits that still parse back to the same
//! value at the precision of the float. For `x` it is the number of hex
//! digits after the point, and negative gives as many as the value needs.
//! `b` and `p` ignore the precision.

use std::fmt;

use mparith_nat::{Nat, WORD_BITS};

use crate::decimal::Decimal;
use crate::float::{Float, Form};

fn push_digits(buf: &mut String, digits: &[u8]) {
    buf.extend(digits.iter().map(|&c| char::from(c)));
}

/// Append `sign` and at least two digits of `|exp|`.
fn push_exp(buf: &mut String, exp: i64) {
    buf.push(if exp < 0 { '-' } else { '+' });
    buf.push_str(&format!("{:02}", exp.unsigned_abs()));
}

/// The shortest decimal in `d` that still rounds to `x` at `x.prec` bits.
fn round_shortest(d: &mut Decimal, x: &Float) {
    if d.len() == 0 {
        return;
    }

    // widen the mantissa to prec+1 bits so its lsb is half an ulp
    let mut mant = x.mant.clone();
    let bits = mant.bit_len() as i64;
    let mut exp = i64::from(x.exp) - bits;
    let s = bits - (i64::from(x.prec) + 1);
    if s < 0 {
        mant.shl_assign((-s) as usize);
    } else if s > 0 {
        mant.shr_assign(s as usize);
    }
    exp += s;

    let one = Nat::from_u64(1);
    let mut tmp = Nat::new();
    tmp.sub(&mant, &one);
    let lower = Decimal::new(&tmp, exp);
    tmp.add(&mant, &one);
    let upper = Decimal::new(&tmp, exp);

    // The bounds round back to x only when its mantissa is even. Bit 1
    // is the last bit of the unwidened mantissa.
    let inclusive = mant.low_u64() & 2 == 0;

    for i in 0..d.len() {
        let m = d.mant[i];
        let l = lower.at(i as i64);
        let u = upper.at(i as i64);

        // truncating is fine once lower differs, or when lower is reached
        // exactly and may be used
        let ok_down = l != m || (inclusive && i + 1 == lower.len());
        // rounding up is fine if upper differs and is not reached by it
        let ok_up = m != u && (inclusive || m + 1 < u || i + 1 < upper.len());

        match (ok_down, ok_up) {
            (true, true) => {
                d.round(i as i64 + 1);
                return;
            }
            (true, false) => {
                d.round_down(i + 1);
                return;
            }
            (false, true) => {
                d.round_up(i + 1);
                return;
            }
            (false, false) => {}
        }
    }
}

/// `d.ddddde±dd` with `prec` digits after the point.
fn fmt_e(buf: &mut String, fmt: char, prec: i64, d: &Decimal) {
    buf.push(char::from(d.mant.first().copied().unwrap_or(b'0')));
    if prec > 0 {
        buf.push('.');
        let prec = prec as usize;
        let m = d.len().min(prec + 1);
        let mut i = 1;
        if i < m {
            push_digits(buf, &d.mant[i..m]);
            i = m;
        }
        buf.extend(std::iter::repeat('0').take((prec + 1).saturating_sub(i)));
    }
    buf.push(fmt);
    // the first digit sits before the point
    let exp = if d.len() > 0 { i64::from(d.exp) - 1 } else { 0 };
    push_exp(buf, exp);
}

/// `ddddd.ddd` with `prec` digits after the point.
fn fmt_f(buf: &mut String, prec: i64, d: &Decimal) {
    if d.exp > 0 {
        let m = d.len().min(d.exp as usize);
        push_digits(buf, &d.mant[..m]);
        buf.extend(std::iter::repeat('0').take(d.exp as usize - m));
    } else {
        buf.push('0');
    }
    if prec > 0 {
        buf.push('.');
        for i in 0..prec {
            buf.push(char::from(d.at(i64::from(d.exp) + i)));
        }
    }
}

/// Shift `m` so it occupies exactly `n` bits.
fn fit_bits(m: &Nat, n: u64) -> Nat {
    let w = m.len() as u64 * WORD_BITS as u64;
    let mut z = Nat::new();
    if w < n {
        z.shl(m, (n - w) as usize);
    } else {
        z.shr(m, (w - n) as usize);
    }
    z
}

impl Float {
    /// Format `self` with the given format character and precision.
    ///
    /// Infinities give `"+Inf"` and `"-Inf"`. An unknown format character
    /// gives `%` followed by that character.
    #[must_use]
    pub fn text(&self, fmt: char, prec: i32) -> String {
        let mut buf = String::with_capacity(10 + prec.max(0) as usize);
        self.append(&mut buf, fmt, prec);
        buf
    }

    /// Append the output of [`Float::text`] to `buf`.
    ///
    /// Infinities print as `+Inf` or `-Inf` whatever the format. A finite
    /// value with an unknown format prints `%` and the format, unsigned.
    pub fn append(&self, buf: &mut String, fmt: char, prec: i32) {
        if self.form == Form::Inf {
            buf.push_str(if self.neg { "-Inf" } else { "+Inf" });
            return;
        }
        if !matches!(fmt, 'e' | 'E' | 'f' | 'g' | 'G' | 'b' | 'p' | 'x') {
            buf.push('%');
            buf.push(fmt);
            return;
        }
        if self.neg {
            buf.push('-');
        }
        self.append_abs(buf, fmt, prec);
    }

    /// Format |self|; `fmt` is a known format character.
    fn append_abs(&self, buf: &mut String, fmt: char, prec: i32) {
        if self.form == Form::Inf {
            buf.push_str("Inf");
            return;
        }

        match fmt {
            'b' => return self.fmt_b(buf),
            'p' => return self.fmt_p(buf),
            'x' => return self.fmt_x(buf, prec),
            _ => {}
        }

        // exact decimal value, then rounded in decimal
        let mut d = if self.form == Form::Finite {
            Decimal::new(&self.mant, i64::from(self.exp) - self.mant.bit_len() as i64)
        } else {
            Decimal::default()
        };

        let mut prec = i64::from(prec);
        let shortest = prec < 0;
        if shortest {
            round_shortest(&mut d, self);
            let len = d.len() as i64;
            prec = match fmt {
                'e' | 'E' => len - 1,
                'f' => (len - i64::from(d.exp)).max(0),
                _ => len,
            };
        } else {
            match fmt {
                'e' | 'E' => d.round(1 + prec),
                'f' => d.round(i64::from(d.exp) + prec),
                _ => {
                    if prec == 0 {
                        prec = 1;
                    }
                    d.round(prec);
                }
            }
        }

        match fmt {
            'e' | 'E' => fmt_e(buf, fmt, prec, &d),
            'f' => fmt_f(buf, prec, &d),
            _ => {
                let len = d.len() as i64;
                let dexp = i64::from(d.exp);

                // trailing zeros are not printed in %e form
                let mut eprec = prec;
                if eprec > len && len >= dexp {
                    eprec = len;
                }
                // shortest output switches to %e at the usual magnitude
                if shortest {
                    eprec = 6;
                }
                let exp = dexp - 1;
                if exp < -4 || exp >= eprec {
                    let prec = prec.min(len);
                    let efmt = if fmt == 'g' { 'e' } else { 'E' };
                    fmt_e(buf, efmt, prec - 1, &d);
                    return;
                }
                if prec > dexp {
                    prec = len;
                }
                fmt_f(buf, (prec - dexp).max(0), &d);
            }
        }
    }

    /// Integer mantissa of exactly `prec` bits and a power-of-two exponent.
    fn fmt_b(&self, buf: &mut String) {
        if self.form == Form::Zero {
            buf.push('0');
            return;
        }
        let m = fit_bits(&self.mant, u64::from(self.prec));
        buf.push_str(&m.to_string_radix(10));
        buf.push('p');
        let e = i64::from(self.exp) - i64::from(self.prec);
        if e >= 0 {
            buf.push('+');
        }
        buf.push_str(&e.to_string());
    }

    /// Hex fraction in `[0.5, 1)` with trailing zeros dropped.
    fn fmt_p(&self, buf: &mut String) {
        if self.form == Form::Zero {
            buf.push('0');
            return;
        }
        let words = self.mant.as_words();
        let low = words.iter().position(|&w| w != 0).unwrap_or(words.len());
        let m = Nat::from_words(words[low..].to_vec());
        buf.push_str("0x.");
        buf.push_str(m.to_string_radix(16).trim_end_matches('0'));
        buf.push('p');
        if self.exp >= 0 {
            buf.push('+');
        }
        buf.push_str(&self.exp.to_string());
    }

    /// `0x1.hhhp±dd` with `prec` hex digits, or as many as needed.
    fn fmt_x(&self, buf: &mut String, prec: i32) {
        if self.form == Form::Zero {
            buf.push_str("0x0");
            if prec > 0 {
                buf.push('.');
                buf.extend(std::iter::repeat('0').take(prec as usize));
            }
            buf.push_str("p+00");
            return;
        }

        // n bits is one leading bit plus whole hex digits
        let n = if prec < 0 {
            1 + (self.min_prec() as u32 + 2) / 4 * 4
        } else {
            (prec as u32).saturating_mul(4).saturating_add(1)
        };
        let mut x = Float::with_prec(n);
        x.set_mode(self.mode);
        x.set(self);

        let m = fit_bits(&x.mant, u64::from(n));
        let hm = m.to_string_radix(16);
        buf.push_str("0x1");
        if hm.len() > 1 {
            buf.push('.');
            buf.push_str(&hm[1..]);
        }
        buf.push('p');
        push_exp(buf, i64::from(x.exp) - 1);
    }

    /// Pad |self| formatted with `fmt` through the formatter, which adds
    /// the sign.
    fn pad_formatted(&self, f: &mut fmt::Formatter<'_>, fmt: char, prec: i32) -> fmt::Result {
        let mut buf = String::new();
        self.append_abs(&mut buf, fmt, prec);
        f.pad_integral(!self.neg, "", &buf)
    }
}

fn precision(f: &fmt::Formatter<'_>) -> i32 {
    f.precision().map_or(-1, |p| i32::try_from(p).unwrap_or(i32::MAX))
}

impl fmt::Display for Float {
    /// Shortest decimal form (`'g'`), or fixed point (`'f'`) when a
    /// precision is given.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(_) => self.pad_formatted(f, 'f', precision(f)),
            None => self.pad_formatted(f, 'g', -1),
        }
    }
}

impl fmt::LowerExp for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.pad_formatted(f, 'e', precision(f))
    }
}

impl fmt::UpperExp for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.pad_formatted(f, 'E', precision(f))
    }
}

impl fmt::LowerHex for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.pad_formatted(f, 'x', precision(f))
    }
}

impl fmt::UpperHex for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        self.append_abs(&mut buf, 'x', precision(f));
        f.pad_integral(!self.neg, "", &buf.to_ascii_uppercase())
    }
}

impl fmt::Debug for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Float")
            .field("value", &format_args!("{}", self.text('g', -1)))
            .field("prec", &self.prec)
            .field("mode", &self.mode)
            .field("acc", &self.acc)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::RoundingMode;
    use mparith_nat::Context;

    fn float(s: &str, prec: u32) -> Float {
        Float::parse_float(s, 0, prec, RoundingMode::ToNearestEven, &Context::default())
            .unwrap()
            .0
    }

    #[test]
    fn text_formats() {
        let cases: &[(&str, u32, char, i32, &str)] = &[
            ("0", 10, 'f', 0, "0"),
            ("-0", 10, 'f', 0, "-0"),
            ("1", 10, 'f', 0, "1"),
            ("-1", 10, 'f', 0, "-1"),
            ("1.459", 100, 'e', 0, "1e+00"),
            ("2.459", 100, 'e', 1, "2.5e+00"),
            ("3.459", 100, 'e', 2, "3.46e+00"),
            ("4.459", 100, 'e', 3, "4.459e+00"),
            ("5.459", 100, 'e', 4, "5.4590e+00"),
            ("1.459", 100, 'f', 0, "1"),
            ("2.459", 100, 'f', 1, "2.5"),
            ("3.459", 100, 'f', 2, "3.46"),
            ("5.459", 100, 'f', 4, "5.4590"),
            ("0", 10, 'b', 0, "0"),
            ("-0", 10, 'b', 0, "-0"),
            ("1.0", 10, 'b', 0, "512p-9"),
            ("-1.0", 10, 'b', 0, "-512p-9"),
            ("0", 10, 'p', 0, "0"),
            ("1024.0", 10, 'p', 0, "0x.8p+11"),
            ("-1024.0", 10, 'p', 0, "-0x.8p+11"),
            ("1", 64, 'e', 5, "1.00000e+00"),
            ("1", 64, 'f', 5, "1.00000"),
            ("1", 64, 'g', 5, "1"),
            ("1", 64, 'g', -1, "1"),
            ("20", 64, 'g', -1, "20"),
            ("1e21", 64, 'f', 5, "1000000000000000000000.00000"),
            ("1e21", 64, 'g', -1, "1e+21"),
            ("1e21", 64, 'E', 2, "1.00E+21"),
            ("100000", 64, 'g', -1, "100000"),
            ("1e6", 64, 'g', -1, "1e+06"),
            ("1e-5", 64, 'g', -1, "1e-05"),
            ("32", 64, 'g', 0, "3e+01"),
            ("123456", 64, 'G', 3, "1.23E+05"),
            ("0.000123", 64, 'g', -1, "0.000123"),
            ("0.001", 64, 'f', 1, "0.0"),
            ("0.06", 64, 'f', 1, "0.1"),
            ("100", 64, 'x', -1, "0x1.9p+06"),
            ("1", 64, 'x', -1, "0x1p+00"),
            ("3", 64, 'x', 4, "0x1.8000p+01"),
            ("-0.75", 64, 'x', 0, "-0x1p+00"),
            ("0", 64, 'x', 0, "0x0p+00"),
            ("0", 64, 'x', 2, "0x0.00p+00"),
            ("Inf", 64, 'g', -1, "+Inf"),
            ("-Inf", 64, 'f', 3, "-Inf"),
            ("-1", 64, 'z', 0, "%z"),
            ("Inf", 64, 'z', 0, "+Inf"),
            ("-Inf", 64, 'q', -1, "-Inf"),
            ("-Inf", 64, 'b', 0, "-Inf"),
        ];
        for &(s, prec, fmt, digits, want) in cases {
            assert_eq!(float(s, prec).text(fmt, digits), want, "{s} prec {prec} %{fmt} {digits}");
        }
    }

    #[test]
    fn shortest_at_double_precision() {
        let ctx = Context::default();
        let mut third = Float::with_prec(53);
        third.quo(&Float::from_f64(1.0).unwrap(), &Float::from_f64(3.0).unwrap(), &ctx).unwrap();
        assert_eq!(third.text('g', -1), "0.3333333333333333");

        for (x, want) in [(0.1, "0.1"), (123.456, "123.456"), (1e23, "1e+23"), (-2.5e-7, "-2.5e-07")] {
            assert_eq!(Float::from_f64(x).unwrap().text('g', -1), want);
        }
        assert_eq!(Float::from_f64(0.1).unwrap().text('e', -1), "1e-01");
        assert_eq!(Float::from_f64(0.1).unwrap().text('f', -1), "0.1");
    }

    #[test]
    fn shortest_round_trips() {
        let vals = [0.1, 0.2, 0.3, 2.0 / 3.0, 1e-300, 1.7e308, 123_456_789.123, 3.0e-10, 299_792_458.5];
        for x in vals {
            let s = Float::from_f64(x).unwrap().text('g', -1);
            assert_eq!(s.parse::<f64>().unwrap(), x, "{s}");
            let back = Float::parse_float(&s, 10, 53, RoundingMode::ToNearestEven, &Context::default())
                .unwrap()
                .0;
            assert_eq!(back, Float::from_f64(x).unwrap(), "{s}");
        }
    }

    #[test]
    fn formatter_traits() {
        let x = float("-1.5", 53);
        assert_eq!(x.to_string(), "-1.5");
        assert_eq!(format!("{x:.3}"), "-1.500");
        assert_eq!(format!("{x:e}"), "-1.5e+00");
        assert_eq!(format!("{x:.2E}"), "-1.50E+00");
        assert_eq!(format!("{x:x}"), "-0x1.8p+00");
        assert_eq!(format!("{x:X}"), "-0X1.8P+00");
        assert_eq!(format!("{x:>8}"), "    -1.5");
        assert_eq!(format!("{x:08.2}"), "-0001.50");
        assert_eq!(format!("{:+}", float("2", 53)), "+2");
        assert_eq!(format!("{}", float("-0", 53)), "-0");
        assert_eq!(format!("{}", float("-Inf", 53)), "-Inf");
        assert_eq!(
            format!("{:?}", float("0.5", 10)),
            "Float { value: 0.5, prec: 10, mode: ToNearestEven, acc: Exact }"
        );
    }
}
