//! The `Nat` digit vector and its linear-time operations.
//!
//! Operations follow a destination style: `z.add(&x, &y)` stores `x + y`
//! in `z`, reusing `z`'s allocation. The borrow checker guarantees that a
//! destination never aliases an operand; in-place updates go through the
//! `*_assign` methods and the `std::ops` assignment traits instead.

use std::cmp::Ordering;
use std::fmt;

use crate::arith::{self, Word, WORD_BITS};
use crate::context::Context;

/// Unsigned multi-precision integer, least significant word first.
///
/// The vector is always normalized: it never ends in a zero word, so the
/// value zero is the empty vector.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Nat {
    pub(crate) words: Vec<Word>,
}

/// Length of `x` without its most significant zero words.
#[inline]
pub(crate) fn norm_len(x: &[Word]) -> usize {
    let mut n = x.len();
    while n > 0 && x[n - 1] == 0 {
        n -= 1;
    }
    n
}

/// `x` without its most significant zero words.
#[inline]
pub(crate) fn normalized(x: &[Word]) -> &[Word] {
    &x[..norm_len(x)]
}

/// Compare two normalized word slices.
pub(crate) fn cmp_words(x: &[Word], y: &[Word]) -> Ordering {
    if x.len() != y.len() {
        return x.len().cmp(&y.len());
    }
    for i in (0..x.len()).rev() {
        match x[i].cmp(&y[i]) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}

/// z[i..] += x, propagating the carry as far as z reaches.
pub(crate) fn add_at(z: &mut [Word], x: &[Word], i: usize) {
    let n = x.len();
    if n == 0 {
        return;
    }
    let c = arith::add_vv_in(&mut z[i..i + n], x);
    if c != 0 {
        let j = i + n;
        if j < z.len() {
            arith::add_scalar(&mut z[j..], c);
        }
    }
}

impl Nat {
    /// The value zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Build from a single `u64`.
    #[must_use]
    pub fn from_u64(x: u64) -> Self {
        let mut z = Self::new();
        z.set_u64(x);
        z
    }

    /// Build from little-endian words; trailing zero words are dropped.
    #[must_use]
    pub fn from_words(words: Vec<Word>) -> Self {
        let mut z = Self { words };
        z.norm();
        z
    }

    /// A zero value whose buffer comes from the context's scratch pool.
    pub(crate) fn scratch(ctx: &Context, capacity: usize) -> Self {
        let mut words = ctx.pool().acquire(capacity);
        words.clear();
        Self { words }
    }

    /// Give this value's buffer back to the context's scratch pool.
    pub(crate) fn recycle(self, ctx: &Context) {
        ctx.pool().release(self.words);
    }

    /// The little-endian words of the value.
    #[must_use]
    pub fn as_words(&self) -> &[Word] {
        &self.words
    }

    /// Consume the value, returning its words.
    #[must_use]
    pub fn into_words(self) -> Vec<Word> {
        self.words
    }

    /// Raw access to the word vector.
    ///
    /// The caller must leave the vector normalized, or call [`Nat::norm`].
    pub fn words_mut(&mut self) -> &mut Vec<Word> {
        &mut self.words
    }

    /// Drop most significant zero words.
    pub fn norm(&mut self) {
        let n = norm_len(&self.words);
        self.words.truncate(n);
    }

    /// Resize to `n` zeroed words, keeping the allocation when possible.
    pub(crate) fn make(&mut self, n: usize) -> &mut [Word] {
        self.words.clear();
        self.words.resize(n, 0);
        &mut self.words
    }

    /// Number of words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.words.is_empty()
    }

    /// Set to zero, keeping the allocation.
    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Copy `x` into `self`.
    pub fn set(&mut self, x: &Nat) {
        self.words.clone_from(&x.words);
    }

    /// Set to a single word.
    pub fn set_u64(&mut self, x: u64) {
        self.words.clear();
        if x != 0 {
            self.words.push(x);
        }
    }

    /// The low 64 bits.
    #[must_use]
    pub fn low_u64(&self) -> u64 {
        self.words.first().copied().unwrap_or(0)
    }

    /// The value as a `u64`, if it fits.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        (self.words.len() <= 1).then(|| self.low_u64())
    }

    /// Length in bits; zero has length 0.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        match self.words.last() {
            Some(&top) => (self.words.len() - 1) * WORD_BITS + (64 - top.leading_zeros() as usize),
            None => 0,
        }
    }

    /// Number of consecutive zero bits from the least significant end.
    /// Zero has no trailing zero bits.
    #[must_use]
    pub fn trailing_zero_bits(&self) -> usize {
        for (i, &w) in self.words.iter().enumerate() {
            if w != 0 {
                return i * WORD_BITS + w.trailing_zeros() as usize;
            }
        }
        0
    }

    /// Bit `i` of the value.
    #[must_use]
    pub fn bit(&self, i: usize) -> u32 {
        let j = i / WORD_BITS;
        match self.words.get(j) {
            Some(&w) => ((w >> (i % WORD_BITS)) & 1) as u32,
            None => 0,
        }
    }

    /// Whether any of the bits below position `i` is set.
    #[must_use]
    pub fn sticky(&self, i: usize) -> bool {
        let j = i / WORD_BITS;
        if j >= self.words.len() {
            return !self.words.is_empty();
        }
        if self.words[..j].iter().any(|&w| w != 0) {
            return true;
        }
        let s = i % WORD_BITS;
        s != 0 && self.words[j] << (WORD_BITS - s) != 0
    }

    /// self = x + y.
    pub fn add(&mut self, x: &Nat, y: &Nat) {
        let (x, y) = if x.len() < y.len() { (y, x) } else { (x, y) };
        let (m, n) = (x.len(), y.len());
        if m == 0 {
            self.clear();
            return;
        }
        if n == 0 {
            self.set(x);
            return;
        }
        let z = self.make(m + 1);
        let mut c = arith::add_vv(&mut z[..n], &x.words[..n], &y.words);
        if m > n {
            c = arith::add_vw(&mut z[n..m], &x.words[n..], c);
        }
        z[m] = c;
        self.norm();
    }

    /// self = x - y.
    ///
    /// # Panics
    ///
    /// Panics if `x < y`.
    pub fn sub(&mut self, x: &Nat, y: &Nat) {
        let (m, n) = (x.len(), y.len());
        assert!(m >= n, "nat subtraction underflow");
        if m == 0 {
            self.clear();
            return;
        }
        if n == 0 {
            self.set(x);
            return;
        }
        let z = self.make(m);
        let mut c = arith::sub_vv(&mut z[..n], &x.words[..n], &y.words);
        if m > n {
            c = arith::sub_vw(&mut z[n..], &x.words[n..], c);
        }
        assert!(c == 0, "nat subtraction underflow");
        self.norm();
    }

    /// self += y.
    pub fn add_words_assign(&mut self, y: &[Word]) {
        let y = normalized(y);
        if y.len() > self.words.len() {
            self.words.resize(y.len(), 0);
        }
        let c = arith::add_vv_in(&mut self.words[..y.len()], y);
        let c = arith::add_scalar(&mut self.words[y.len()..], c);
        if c != 0 {
            self.words.push(c);
        }
    }

    /// self -= y.
    ///
    /// # Panics
    ///
    /// Panics if `self < y`.
    pub fn sub_words_assign(&mut self, y: &[Word]) {
        let y = normalized(y);
        assert!(self.words.len() >= y.len(), "nat subtraction underflow");
        let c = arith::sub_vv_in(&mut self.words[..y.len()], y);
        let c = arith::sub_scalar(&mut self.words[y.len()..], c);
        assert!(c == 0, "nat subtraction underflow");
        self.norm();
    }

    /// self += w for a single word.
    pub fn add_word_assign(&mut self, w: Word) {
        let c = arith::add_scalar(&mut self.words, w);
        if c != 0 {
            self.words.push(c);
        }
    }

    /// self -= w for a single word.
    ///
    /// # Panics
    ///
    /// Panics if `self < w`.
    pub fn sub_word_assign(&mut self, w: Word) {
        let borrow = arith::sub_scalar(&mut self.words, w);
        assert!(borrow == 0, "nat subtraction underflow");
        self.norm();
    }

    /// self = x * y + r for single words `y` and `r`.
    pub fn mul_add_ww(&mut self, x: &Nat, y: Word, r: Word) {
        let m = x.len();
        if m == 0 || y == 0 {
            self.set_u64(r);
            return;
        }
        let z = self.make(m + 1);
        z[m] = arith::mul_add_vww(&mut z[..m], &x.words, y, r);
        self.norm();
    }

    /// self = self * y + r for single words `y` and `r`.
    pub fn mul_add_ww_assign(&mut self, y: Word, r: Word) {
        if self.words.is_empty() || y == 0 {
            self.set_u64(r);
            return;
        }
        let c = arith::mul_add_vww_in(&mut self.words, y, r);
        if c != 0 {
            self.words.push(c);
        }
    }

    /// self = x << s.
    pub fn shl(&mut self, x: &Nat, s: usize) {
        let m = x.len();
        if m == 0 {
            self.clear();
            return;
        }
        let n = m + s / WORD_BITS;
        let z = self.make(n + 1);
        z[n] = arith::shl_vu(&mut z[n - m..n], &x.words, (s % WORD_BITS) as u32);
        self.norm();
    }

    /// self <<= s.
    pub fn shl_assign(&mut self, s: usize) {
        let m = self.len();
        if m == 0 || s == 0 {
            return;
        }
        let n = m + s / WORD_BITS;
        self.words.resize(n + 1, 0);
        self.words.copy_within(0..m, n - m);
        self.words[..n - m].fill(0);
        self.words[n] = arith::shl_vu_in(&mut self.words[n - m..n], (s % WORD_BITS) as u32);
        self.norm();
    }

    /// self = x >> s.
    pub fn shr(&mut self, x: &Nat, s: usize) {
        let m = x.len();
        let drop = s / WORD_BITS;
        if drop >= m {
            self.clear();
            return;
        }
        let n = m - drop;
        let z = self.make(n);
        arith::shr_vu(z, &x.words[m - n..], (s % WORD_BITS) as u32);
        self.norm();
    }

    /// self >>= s.
    pub fn shr_assign(&mut self, s: usize) {
        let m = self.len();
        let drop = s / WORD_BITS;
        if drop >= m {
            self.clear();
            return;
        }
        let n = m - drop;
        self.words.copy_within(drop..m, 0);
        self.words.truncate(n);
        arith::shr_vu_in(&mut self.words, (s % WORD_BITS) as u32);
        self.norm();
    }

    /// self = x with bit `i` set to `b`.
    pub fn set_bit(&mut self, x: &Nat, i: usize, b: bool) {
        let j = i / WORD_BITS;
        let mask: Word = 1 << (i % WORD_BITS);
        let n = x.len();
        if b {
            let z = self.make(n.max(j + 1));
            z[..n].copy_from_slice(&x.words);
            z[j] |= mask;
        } else {
            self.set(x);
            if j < n {
                self.words[j] &= !mask;
                self.norm();
            }
        }
    }

    /// self = x & y.
    pub fn and(&mut self, x: &Nat, y: &Nat) {
        let m = x.len().min(y.len());
        let z = self.make(m);
        for (i, zi) in z.iter_mut().enumerate() {
            *zi = x.words[i] & y.words[i];
        }
        self.norm();
    }

    /// self = x & !y.
    pub fn and_not(&mut self, x: &Nat, y: &Nat) {
        let m = x.len();
        let n = y.len().min(m);
        let z = self.make(m);
        for i in 0..n {
            z[i] = x.words[i] & !y.words[i];
        }
        z[n..m].copy_from_slice(&x.words[n..m]);
        self.norm();
    }

    /// self = x | y.
    pub fn or(&mut self, x: &Nat, y: &Nat) {
        let (long, short) = if x.len() >= y.len() { (x, y) } else { (y, x) };
        let (m, n) = (long.len(), short.len());
        let z = self.make(m);
        for i in 0..n {
            z[i] = long.words[i] | short.words[i];
        }
        z[n..m].copy_from_slice(&long.words[n..m]);
        self.norm();
    }

    /// self = x ^ y.
    pub fn xor(&mut self, x: &Nat, y: &Nat) {
        let (long, short) = if x.len() >= y.len() { (x, y) } else { (y, x) };
        let (m, n) = (long.len(), short.len());
        let z = self.make(m);
        for i in 0..n {
            z[i] = long.words[i] ^ short.words[i];
        }
        z[n..m].copy_from_slice(&long.words[n..m]);
        self.norm();
    }

    /// Big-endian bytes without leading zeros; zero is empty.
    #[must_use]
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.len() * 8];
        self.fill_bytes_be(&mut buf);
        let lead = buf.iter().take_while(|&&b| b == 0).count();
        buf.drain(..lead);
        buf
    }

    /// Write the value big-endian into the whole of `buf`, zero-extended.
    ///
    /// # Panics
    ///
    /// Panics if the value does not fit in `buf`.
    pub fn fill_bytes_be(&self, buf: &mut [u8]) {
        buf.fill(0);
        let mut i = buf.len();
        for &w in &self.words {
            for b in w.to_le_bytes() {
                if i > 0 {
                    i -= 1;
                    buf[i] = b;
                } else {
                    assert!(b == 0, "buffer too small to fit value");
                }
            }
        }
    }

    /// Set from big-endian bytes.
    pub fn set_bytes_be(&mut self, buf: &[u8]) {
        let n = buf.len().div_ceil(8);
        let z = self.make(n);
        for (k, &b) in buf.iter().rev().enumerate() {
            z[k / 8] |= Word::from(b) << (8 * (k % 8));
        }
        self.norm();
    }

    /// Set `self` to a uniformly distributed value in `[0, limit)`.
    ///
    /// Candidates with the bit length of `limit` are drawn until one falls
    /// below it, which takes fewer than two draws on average.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    pub fn random<R: rand::Rng + ?Sized>(&mut self, rng: &mut R, limit: &Nat) {
        assert!(!limit.is_zero(), "random value below zero limit");
        let n = limit.len();
        let top_bits = limit.bit_len() % WORD_BITS;
        let mask = if top_bits == 0 {
            Word::MAX
        } else {
            (1 << top_bits) - 1
        };

        loop {
            let z = self.make(n);
            for w in z.iter_mut() {
                *w = rng.gen();
            }
            z[n - 1] &= mask;
            if cmp_words(normalized(z), &limit.words).is_lt() {
                break;
            }
        }
        self.norm();
    }
}

impl Ord for Nat {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_words(&self.words, &other.words)
    }
}

impl PartialOrd for Nat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u64> for Nat {
    fn from(x: u64) -> Self {
        Self::from_u64(x)
    }
}

impl std::ops::AddAssign<&Nat> for Nat {
    fn add_assign(&mut self, rhs: &Nat) {
        self.add_words_assign(&rhs.words);
    }
}

impl std::ops::SubAssign<&Nat> for Nat {
    fn sub_assign(&mut self, rhs: &Nat) {
        self.sub_words_assign(&rhs.words);
    }
}

impl fmt::Debug for Nat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nat(0x{})", self.to_string_radix(16))
    }
}

impl fmt::Display for Nat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(true, "", &self.to_string_radix(10))
    }
}
