//! Text conversion for [`Int`].

use std::fmt;
use std::str::FromStr;

use mparith_nat::{Scanner, MAX_BASE};

use crate::error::ParseError;
use crate::int::Int;

/// Consume an optional leading sign; returns whether it was `-`.
pub(crate) fn scan_sign(r: &mut Scanner<'_>) -> Result<bool, ParseError> {
    match r.read_byte() {
        None => Err(ParseError::Empty),
        Some(b'-') => Ok(true),
        Some(b'+') => Ok(false),
        Some(_) => {
            r.unread_byte();
            Ok(false)
        }
    }
}

/// Fail unless `r` is at the end of `s`.
pub(crate) fn expect_end(s: &str, r: &Scanner<'_>) -> Result<(), ParseError> {
    match s[r.position()..].chars().next() {
        None => Ok(()),
        Some(found) => Err(ParseError::TrailingInput { found }),
    }
}

impl Int {
    /// Scan an optionally signed integer from `r`, returning the base used.
    pub(crate) fn scan(&mut self, r: &mut Scanner<'_>, base: u32) -> Result<u32, ParseError> {
        let neg = scan_sign(r)?;
        let (base, _) = self.abs.scan(r, base, false)?;
        self.neg = neg && !self.abs.is_zero();
        Ok(base)
    }

    /// Parse `s` in `base`, which is 0 or in `2..=62`.
    ///
    /// With base 0 the prefixes `0b`, `0o` and `0x` select the base, a bare
    /// leading `0` means octal and `_` may separate digits. Letters are
    /// case-insensitive up to base 36; above that `a-z` come before `A-Z`.
    /// The whole string must be consumed.
    pub fn from_str_radix(s: &str, base: u32) -> Result<Int, ParseError> {
        if base != 0 && !(2..=MAX_BASE).contains(&base) {
            return Err(ParseError::InvalidBase(base));
        }
        let mut r = Scanner::new(s);
        let mut z = Int::new();
        z.scan(&mut r, base)?;
        expect_end(s, &r)?;
        Ok(z)
    }

    /// Text representation in `base`, with a leading `-` when negative.
    ///
    /// # Panics
    ///
    /// Panics if `base` is not in `2..=62`.
    #[must_use]
    pub fn to_string_radix(&self, base: u32) -> String {
        let digits = self.abs.to_string_radix(base);
        if self.neg {
            format!("-{digits}")
        } else {
            digits
        }
    }
}

impl FromStr for Int {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Int::from_str_radix(s, 10)
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.neg, "", &self.abs.to_string_radix(10))
    }
}

impl fmt::Debug for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::LowerHex for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.neg, "0x", &self.abs.to_string_radix(16))
    }
}

impl fmt::UpperHex for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.abs.to_string_radix(16).to_ascii_uppercase();
        f.pad_integral(!self.neg, "0x", &digits)
    }
}

impl fmt::Octal for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.neg, "0o", &self.abs.to_string_radix(8))
    }
}

impl fmt::Binary for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.neg, "0b", &self.abs.to_string_radix(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mparith_nat::ScanError;

    #[test]
    fn parse_bases_and_prefixes() {
        let cases: &[(&str, u32, i64)] = &[
            ("0", 0, 0),
            ("-0", 0, 0),
            ("+17", 10, 17),
            ("-17", 10, -17),
            ("0x1F", 0, 31),
            ("-0b101", 0, -5),
            ("0o17", 0, 15),
            ("017", 0, 15),
            ("1_000_000", 0, 1_000_000),
            ("zz", 36, 36 * 36 - 1),
            ("ZZ", 36, 36 * 36 - 1),
            ("Z", 62, 61),
        ];
        for &(s, base, want) in cases {
            assert_eq!(
                Int::from_str_radix(s, base).unwrap(),
                Int::from_i64(want),
                "{s:?} base {base}"
            );
        }
    }

    #[test]
    fn parse_errors() {
        assert_eq!(Int::from_str_radix("", 10), Err(ParseError::Empty));
        assert_eq!(
            Int::from_str_radix("-", 10),
            Err(ParseError::Scan(ScanError::NoDigits))
        );
        assert_eq!(
            Int::from_str_radix("12a", 10),
            Err(ParseError::TrailingInput { found: 'a' })
        );
        assert_eq!(
            Int::from_str_radix("1__0", 0),
            Err(ParseError::Scan(ScanError::InvalidSeparator))
        );
        assert_eq!(
            Int::from_str_radix("1_0", 10),
            Err(ParseError::TrailingInput { found: '_' })
        );
        assert_eq!(Int::from_str_radix("1", 1), Err(ParseError::InvalidBase(1)));
        assert_eq!(Int::from_str_radix("1", 63), Err(ParseError::InvalidBase(63)));
        assert!("12 ".parse::<Int>().is_err());
    }

    #[test]
    fn formatting() {
        let x = Int::from_i64(-255);
        assert_eq!(x.to_string(), "-255");
        assert_eq!(format!("{x:x}"), "-ff");
        assert_eq!(format!("{x:#X}"), "-0xFF");
        assert_eq!(format!("{x:#o}"), "-0o377");
        assert_eq!(format!("{x:b}"), "-11111111");
        assert_eq!(format!("{x:>8}"), "    -255");
        assert_eq!(format!("{x:08}"), "-0000255");
        assert_eq!(format!("{:+}", Int::from_i64(3)), "+3");
        assert_eq!(Int::new().to_string(), "0");
        assert_eq!(x.to_string_radix(36), "-73");
    }

    #[test]
    fn text_round_trip() {
        let s = "-123456789012345678901234567890123456789";
        let x: Int = s.parse().unwrap();
        assert_eq!(x.to_string(), s);
        for base in [2, 7, 16, 36, 62] {
            let t = x.to_string_radix(base);
            assert_eq!(Int::from_str_radix(&t, base).unwrap(), x, "base {base}");
        }
    }
}
