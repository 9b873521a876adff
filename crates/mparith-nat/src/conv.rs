//! Conversion between `Nat` and text.

use crate::arith::{Word, WORD_BITS};
use crate::error::ScanError;
use crate::nat::Nat;

/// Digit characters, in value order.
const DIGITS: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Largest supported conversion base.
pub const MAX_BASE: u32 = 62;

/// Largest base in which letters are case-insensitive.
const MAX_BASE_SMALL: u32 = 36;

/// Largest power of `b` that fits in a word, and its exponent.
fn max_pow(b: Word) -> (Word, usize) {
    let mut p = b;
    let mut n = 1;
    let max = Word::MAX / b;
    while p <= max {
        p *= b;
        n += 1;
    }
    (p, n)
}

/// Value of the digit `ch` in base `b`, or `None` if it is not one.
fn digit_value(ch: u8, b: u32) -> Option<Word> {
    let d = match ch {
        b'0'..=b'9' => u32::from(ch - b'0'),
        b'a'..=b'z' => u32::from(ch - b'a') + 10,
        b'A'..=b'Z' if b <= MAX_BASE_SMALL => u32::from(ch - b'A') + 10,
        b'A'..=b'Z' => u32::from(ch - b'A') + MAX_BASE_SMALL,
        _ => return None,
    };
    (d < b).then_some(Word::from(d))
}

/// Byte cursor over the text being parsed, with one byte of push-back.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Start scanning at the beginning of `s`.
    #[must_use]
    pub fn new(s: &'a str) -> Self {
        Self {
            bytes: s.as_bytes(),
            pos: 0,
        }
    }

    /// Next byte, if any.
    pub fn read_byte(&mut self) -> Option<u8> {
        let b = self.bytes.get(self.pos).copied();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    /// Step back over the byte last returned by [`read_byte`](Self::read_byte).
    pub fn unread_byte(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// Next byte without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The unconsumed tail of the input.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

impl Nat {
    /// Text representation in `base`, using the digits `0-9a-zA-Z`.
    ///
    /// # Panics
    ///
    /// Panics if `base` is not in `2..=62`.
    #[must_use]
    pub fn to_string_radix(&self, base: u32) -> String {
        assert!(
            (2..=MAX_BASE).contains(&base),
            "invalid number base {base}"
        );
        if self.is_zero() {
            return "0".to_owned();
        }

        let mut out: Vec<u8> = Vec::new();
        if base.is_power_of_two() {
            // each digit is a fixed run of bits
            let shift = base.trailing_zeros() as usize;
            let mask = (1 << shift) - 1;
            let nbits = self.bit_len();
            let mut pos = 0;
            while pos < nbits {
                let d = self.bits_at(pos, shift) & mask;
                out.push(DIGITS[d as usize]);
                pos += shift;
            }
        } else {
            // peel off ndigits digits at a time with one word division
            let b = Word::from(base);
            let (bb, ndigits) = max_pow(b);
            let mut q = self.clone();
            while !q.is_zero() {
                let mut r = q.div_w_assign(bb);
                if q.is_zero() {
                    while r != 0 {
                        out.push(DIGITS[(r % b) as usize]);
                        r /= b;
                    }
                } else {
                    for _ in 0..ndigits {
                        out.push(DIGITS[(r % b) as usize]);
                        r /= b;
                    }
                }
            }
        }
        out.reverse();
        out.into_iter().map(char::from).collect()
    }

    /// `n` bits starting at bit `pos`, for `n <= WORD_BITS`.
    fn bits_at(&self, pos: usize, n: usize) -> Word {
        let (j, off) = (pos / WORD_BITS, pos % WORD_BITS);
        let mut v = self.words[j] >> off;
        if off + n > WORD_BITS && j + 1 < self.words.len() {
            v |= self.words[j + 1] << (WORD_BITS - off);
        }
        v
    }

    /// Scan a number in `base` from `r` into `self`.
    ///
    /// With `base == 0` the base is taken from a `0b`, `0o` or `0x` prefix
    /// (upper case allowed), defaults to 10, and underscores may separate
    /// successive digits. Without `frac_ok` a bare leading `0` selects
    /// octal. With `frac_ok` a single `.` may appear and only bases 2, 8,
    /// 10 and 16 are accepted.
    ///
    /// Returns the base actually used and the digit count. When a radix
    /// point was seen the count is the negated number of digits after it.
    /// Scanning stops at the first byte that is not part of the number,
    /// which is left unread.
    pub fn scan(
        &mut self,
        r: &mut Scanner<'_>,
        base: u32,
        frac_ok: bool,
    ) -> Result<(u32, isize), ScanError> {
        let base_ok = base == 0
            || (!frac_ok && (2..=MAX_BASE).contains(&base))
            || (frac_ok && matches!(base, 2 | 8 | 10 | 16));
        if !base_ok {
            return Err(ScanError::InvalidBase(base));
        }

        // Previously seen kind of byte: b'_', b'0' (a digit) or b'.'
        // (anything else). A separator may only follow a digit.
        let mut prev = b'.';
        let mut inval_sep = false;
        let mut count: isize = 0;

        let mut ch = r.read_byte();

        let mut b = base;
        let mut prefix = 0u8;
        if base == 0 {
            b = 10;
            if ch == Some(b'0') {
                prev = b'0';
                count = 1;
                ch = r.read_byte();
                if let Some(c) = ch {
                    match c {
                        b'b' | b'B' => (b, prefix) = (2, b'b'),
                        b'o' | b'O' => (b, prefix) = (8, b'o'),
                        b'x' | b'X' => (b, prefix) = (16, b'x'),
                        _ if !frac_ok => (b, prefix) = (8, b'0'),
                        _ => {}
                    }
                    if prefix != 0 {
                        // the prefix is not counted
                        count = 0;
                        if prefix != b'0' {
                            ch = r.read_byte();
                        }
                    }
                }
            }
        }

        // Digits are collected in groups of n into di, then folded into
        // the result with one multiply-add per group.
        self.clear();
        let b1 = Word::from(b);
        let (bn, n) = max_pow(b1);
        let mut di: Word = 0;
        let mut i = 0;
        let mut dp: Option<isize> = None;
        while let Some(c) = ch {
            if c == b'.' && frac_ok && dp.is_none() {
                dp = Some(count);
                prev = b'.';
            } else if c == b'_' && base == 0 {
                if prev != b'0' {
                    inval_sep = true;
                }
                prev = b'_';
            } else {
                let Some(d1) = digit_value(c, b) else {
                    r.unread_byte();
                    break;
                };
                prev = b'0';
                count += 1;

                di = di * b1 + d1;
                i += 1;
                if i == n {
                    self.mul_add_ww_assign(bn, di);
                    di = 0;
                    i = 0;
                }
            }
            ch = r.read_byte();
        }

        let sep_err = inval_sep || prev == b'_';
        if count == 0 {
            // only the octal prefix 0, possibly followed by separators or
            // digits out of range: that is a decimal 0
            if prefix == b'0' {
                self.clear();
                return if sep_err {
                    Err(ScanError::InvalidSeparator)
                } else {
                    Ok((10, 1))
                };
            }
            return Err(ScanError::NoDigits);
        }
        if sep_err {
            return Err(ScanError::InvalidSeparator);
        }

        if i > 0 {
            self.mul_add_ww_assign(b1.pow(i as u32), di);
        }

        if let Some(dp) = dp {
            count = dp - count;
        }
        Ok((b, count))
    }
}
