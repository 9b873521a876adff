//! Decimal digit strings for float formatting.
//!
//! A [`Decimal`] holds the value `0.d1d2...dn × 10^exp` as ASCII digits
//! without trailing zeros. It is built exactly from a binary mantissa and
//! shift and then rounded in decimal, which keeps the conversion free of
//! double rounding.

use mparith_nat::{Nat, Word, WORD_BITS};

/// Largest right shift done in one step; the running remainder times 10
/// must fit in a word.
const MAX_SHIFT: u32 = WORD_BITS as u32 - 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Decimal {
    /// ASCII digits, most significant first.
    pub(crate) mant: Vec<u8>,
    /// Position of the decimal point relative to the first digit.
    pub(crate) exp: i32,
}

impl Decimal {
    /// The exact decimal value of `m × 2^shift`.
    pub(crate) fn new(m: &Nat, shift: i64) -> Self {
        let mut x = Decimal::default();
        if m.is_zero() {
            return x;
        }

        let mut shift = shift;
        let mut m = m.clone();
        if shift < 0 {
            // shifting right in binary is cheap; use up the trailing zeros first
            let ntz = m.trailing_zero_bits() as i64;
            let s = ntz.min(-shift);
            m.shr_assign(s as usize);
            shift += s;
        }
        if shift > 0 {
            m.shl_assign(shift as usize);
            shift = 0;
        }

        let s = m.to_string_radix(10).into_bytes();
        x.exp = s.len() as i32;
        let n = s.iter().rposition(|&c| c != b'0').map_or(0, |i| i + 1);
        x.mant = s[..n].to_vec();

        while shift < 0 {
            let step = (-shift).min(i64::from(MAX_SHIFT));
            x.shr(step as u32);
            shift += step;
        }
        x
    }

    /// Digit `i`, or `'0'` outside the stored digits.
    pub(crate) fn at(&self, i: i64) -> u8 {
        usize::try_from(i)
            .ok()
            .and_then(|i| self.mant.get(i))
            .copied()
            .unwrap_or(b'0')
    }

    pub(crate) fn len(&self) -> usize {
        self.mant.len()
    }

    /// self = self >> s by long division with 2^s, for `s <= MAX_SHIFT`.
    fn shr(&mut self, s: u32) {
        // pick up enough leading digits to cover the first shift
        let mut r = 0;
        let mut n: Word = 0;
        while n >> s == 0 && r < self.mant.len() {
            n = n * 10 + Word::from(self.mant[r] - b'0');
            r += 1;
        }

        if n == 0 {
            self.mant.clear();
            return;
        }
        // past the stored digits the dividend continues with zeros
        while n >> s == 0 {
            r += 1;
            n *= 10;
        }
        self.exp += 1 - r as i32;

        let mask: Word = (1 << s) - 1;
        let mut w = 0;
        while r < self.mant.len() {
            let ch = self.mant[r];
            r += 1;
            let d = n >> s;
            n &= mask;
            self.mant[w] = d as u8 + b'0';
            w += 1;
            n = n * 10 + Word::from(ch - b'0');
        }

        // write further digits into the freed space, then append
        while n > 0 && w < self.mant.len() {
            let d = n >> s;
            n &= mask;
            self.mant[w] = d as u8 + b'0';
            w += 1;
            n *= 10;
        }
        self.mant.truncate(w);
        while n > 0 {
            let d = n >> s;
            n &= mask;
            self.mant.push(d as u8 + b'0');
            n *= 10;
        }

        self.trim();
    }

    /// Whether cutting to `n` digits rounds up; ties go to even.
    fn should_round_up(&self, n: usize) -> bool {
        if self.mant[n] == b'5' && n + 1 == self.mant.len() {
            // exactly halfway
            return n > 0 && (self.mant[n - 1] - b'0') & 1 != 0;
        }
        self.mant[n] >= b'5'
    }

    /// Round to at most `n` digits, to nearest with ties to even. Does
    /// nothing if `n` is negative or not smaller than the digit count.
    pub(crate) fn round(&mut self, n: i64) {
        let Ok(n) = usize::try_from(n) else {
            return;
        };
        if n >= self.mant.len() {
            return;
        }
        if self.should_round_up(n) {
            self.round_up(n);
        } else {
            self.round_down(n);
        }
    }

    pub(crate) fn round_up(&mut self, n: usize) {
        if n >= self.mant.len() {
            return;
        }
        let mut n = n;
        while n > 0 && self.mant[n - 1] >= b'9' {
            n -= 1;
        }
        if n == 0 {
            // all nines
            self.mant.clear();
            self.mant.push(b'1');
            self.exp += 1;
            return;
        }
        self.mant[n - 1] += 1;
        self.mant.truncate(n);
    }

    pub(crate) fn round_down(&mut self, n: usize) {
        if n >= self.mant.len() {
            return;
        }
        self.mant.truncate(n);
        self.trim();
    }

    fn trim(&mut self) {
        let n = self.mant.iter().rposition(|&c| c != b'0').map_or(0, |i| i + 1);
        self.mant.truncate(n);
        if n == 0 {
            self.exp = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(m: u64, shift: i64) -> String {
        let d = Decimal::new(&Nat::from_u64(m), shift);
        format!("0.{}e{}", String::from_utf8(d.mant).unwrap(), d.exp)
    }

    #[test]
    fn exact_conversion() {
        assert_eq!(dec(0, 0), "0.e0");
        assert_eq!(dec(1, 0), "0.1e1");
        assert_eq!(dec(1000, 0), "0.1e4");
        assert_eq!(dec(1, 10), "0.1024e4");
        assert_eq!(dec(1, -1), "0.5e0");
        assert_eq!(dec(3, -3), "0.375e0");
        assert_eq!(dec(1024, -10), "0.1e1");
        assert_eq!(dec(1, -100), "0.7888609052210118054117285652827862296732064351090230047702789306640625e-30");
    }

    #[test]
    fn rounding() {
        let mut d = Decimal::new(&Nat::from_u64(12_345), 0);
        d.round(4);
        assert_eq!(d.mant, b"1234");
        d.round(3);
        assert_eq!(d.mant, b"123");

        let mut d = Decimal::new(&Nat::from_u64(99_951), 0);
        d.round(3);
        assert_eq!((d.mant.as_slice(), d.exp), (&b"1"[..], 6));

        let mut d = Decimal::new(&Nat::from_u64(125), 0);
        d.round(2);
        assert_eq!(d.mant, b"12");
        let mut d = Decimal::new(&Nat::from_u64(135), 0);
        d.round(2);
        assert_eq!(d.mant, b"14");

        let mut d = Decimal::new(&Nat::from_u64(7), 0);
        d.round(-1);
        assert_eq!(d.mant, b"7");
        assert_eq!(d.at(-1), b'0');
        assert_eq!(d.at(5), b'0');
    }
}
