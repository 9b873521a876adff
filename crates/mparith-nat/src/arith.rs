//! Word-level arithmetic on little-endian word vectors.
//!
//! All vector routines operate on slices of equal length unless stated
//! otherwise and return the carry, borrow or remainder that falls out of
//! the top word. The `*_in` variants update their first argument in place.

/// A single digit of a multi-precision number.
pub type Word = u64;

/// Bits per word.
pub const WORD_BITS: usize = 64;

/// Add with carry: a + b + carry -> (sum, `new_carry`)
#[inline]
#[must_use]
pub fn add_with_carry(a: Word, b: Word, carry: Word) -> (Word, Word) {
    let sum = u128::from(a) + u128::from(b) + u128::from(carry);
    (sum as Word, (sum >> 64) as Word)
}

/// Subtract with borrow: a - b - borrow -> (diff, `new_borrow`)
#[inline]
#[must_use]
pub fn sub_with_borrow(a: Word, b: Word, borrow: Word) -> (Word, Word) {
    let (d1, b1) = a.overflowing_sub(b);
    let (d2, b2) = d1.overflowing_sub(borrow);
    (d2, Word::from(b1 | b2))
}

/// Multiply: a * b -> (low, high)
#[inline]
#[must_use]
pub fn mul_wide(a: Word, b: Word) -> (Word, Word) {
    let prod = u128::from(a) * u128::from(b);
    (prod as Word, (prod >> 64) as Word)
}

/// Divide the double word `hi:lo` by `d`: -> (quotient, remainder).
///
/// Requires `hi < d` so that the quotient fits in a word.
#[inline]
#[must_use]
pub fn div_wide(hi: Word, lo: Word, d: Word) -> (Word, Word) {
    debug_assert!(hi < d);
    let n = (u128::from(hi) << 64) | u128::from(lo);
    let d = u128::from(d);
    ((n / d) as Word, (n % d) as Word)
}

/// z = x + y, returning the carry.
pub fn add_vv(z: &mut [Word], x: &[Word], y: &[Word]) -> Word {
    let mut carry = 0;
    for ((zi, &xi), &yi) in z.iter_mut().zip(x).zip(y) {
        let (sum, c) = add_with_carry(xi, yi, carry);
        *zi = sum;
        carry = c;
    }
    carry
}

/// z += y, returning the carry.
pub fn add_vv_in(z: &mut [Word], y: &[Word]) -> Word {
    let mut carry = 0;
    for (zi, &yi) in z.iter_mut().zip(y) {
        let (sum, c) = add_with_carry(*zi, yi, carry);
        *zi = sum;
        carry = c;
    }
    carry
}

/// z = x - y, returning the borrow.
pub fn sub_vv(z: &mut [Word], x: &[Word], y: &[Word]) -> Word {
    let mut borrow = 0;
    for ((zi, &xi), &yi) in z.iter_mut().zip(x).zip(y) {
        let (diff, b) = sub_with_borrow(xi, yi, borrow);
        *zi = diff;
        borrow = b;
    }
    borrow
}

/// z -= y, returning the borrow.
pub fn sub_vv_in(z: &mut [Word], y: &[Word]) -> Word {
    let mut borrow = 0;
    for (zi, &yi) in z.iter_mut().zip(y) {
        let (diff, b) = sub_with_borrow(*zi, yi, borrow);
        *zi = diff;
        borrow = b;
    }
    borrow
}

/// z = x + y for a single word y, returning the carry.
pub fn add_vw(z: &mut [Word], x: &[Word], y: Word) -> Word {
    let mut carry = y;
    for (zi, &xi) in z.iter_mut().zip(x) {
        let (sum, c) = add_with_carry(xi, carry, 0);
        *zi = sum;
        carry = c;
    }
    carry
}

/// z = x - y for a single word y, returning the borrow.
pub fn sub_vw(z: &mut [Word], x: &[Word], y: Word) -> Word {
    let mut borrow = y;
    for (zi, &xi) in z.iter_mut().zip(x) {
        let (diff, b) = sub_with_borrow(xi, borrow, 0);
        *zi = diff;
        borrow = b;
    }
    borrow
}

/// Add a scalar to a slice in place, returning carry.
pub fn add_scalar(data: &mut [Word], scalar: Word) -> Word {
    let mut carry = scalar;
    for limb in data.iter_mut() {
        if carry == 0 {
            break;
        }
        let (sum, c) = add_with_carry(*limb, carry, 0);
        *limb = sum;
        carry = c;
    }
    carry
}

/// Subtract a scalar from a slice in place, returning borrow.
pub fn sub_scalar(data: &mut [Word], scalar: Word) -> Word {
    let mut borrow = scalar;
    for limb in data.iter_mut() {
        if borrow == 0 {
            break;
        }
        let (diff, b) = sub_with_borrow(*limb, borrow, 0);
        *limb = diff;
        borrow = b;
    }
    borrow
}

/// z = x << s for `s < WORD_BITS`, returning the bits shifted out of the top.
pub fn shl_vu(z: &mut [Word], x: &[Word], s: u32) -> Word {
    let n = z.len();
    if s == 0 {
        z.copy_from_slice(&x[..n]);
        return 0;
    }
    if n == 0 {
        return 0;
    }
    let r = 64 - s;
    let c = x[n - 1] >> r;
    for i in (1..n).rev() {
        z[i] = (x[i] << s) | (x[i - 1] >> r);
    }
    z[0] = x[0] << s;
    c
}

/// z <<= s in place for `s < WORD_BITS`, returning the bits shifted out.
pub fn shl_vu_in(z: &mut [Word], s: u32) -> Word {
    let n = z.len();
    if s == 0 || n == 0 {
        return 0;
    }
    let r = 64 - s;
    let c = z[n - 1] >> r;
    for i in (1..n).rev() {
        z[i] = (z[i] << s) | (z[i - 1] >> r);
    }
    z[0] <<= s;
    c
}

/// z = x >> s for `s < WORD_BITS`, returning the bits shifted out of the
/// bottom, left-aligned in the result word.
pub fn shr_vu(z: &mut [Word], x: &[Word], s: u32) -> Word {
    let n = z.len();
    if s == 0 {
        z.copy_from_slice(&x[..n]);
        return 0;
    }
    if n == 0 {
        return 0;
    }
    let r = 64 - s;
    let c = x[0] << r;
    for i in 0..n - 1 {
        z[i] = (x[i] >> s) | (x[i + 1] << r);
    }
    z[n - 1] = x[n - 1] >> s;
    c
}

/// z >>= s in place for `s < WORD_BITS`, returning the bits shifted out.
pub fn shr_vu_in(z: &mut [Word], s: u32) -> Word {
    let n = z.len();
    if s == 0 || n == 0 {
        return 0;
    }
    let r = 64 - s;
    let c = z[0] << r;
    for i in 0..n - 1 {
        z[i] = (z[i] >> s) | (z[i + 1] << r);
    }
    z[n - 1] >>= s;
    c
}

/// z = x * y + r, returning the high word.
pub fn mul_add_vww(z: &mut [Word], x: &[Word], y: Word, r: Word) -> Word {
    let mut c = r;
    for (zi, &xi) in z.iter_mut().zip(x) {
        let t = u128::from(xi) * u128::from(y) + u128::from(c);
        *zi = t as Word;
        c = (t >> 64) as Word;
    }
    c
}

/// z = z * y + r in place, returning the high word.
pub fn mul_add_vww_in(z: &mut [Word], y: Word, r: Word) -> Word {
    let mut c = r;
    for zi in z.iter_mut() {
        let t = u128::from(*zi) * u128::from(y) + u128::from(c);
        *zi = t as Word;
        c = (t >> 64) as Word;
    }
    c
}

/// z += x * y, returning the high word.
pub fn add_mul_vvw(z: &mut [Word], x: &[Word], y: Word) -> Word {
    let mut c = 0;
    for (zi, &xi) in z.iter_mut().zip(x) {
        // (2^64-1)^2 + 2*(2^64-1) == 2^128-1, so this never overflows
        let t = u128::from(xi) * u128::from(y) + u128::from(*zi) + u128::from(c);
        *zi = t as Word;
        c = (t >> 64) as Word;
    }
    c
}

/// z = (xn:x) / y, returning the remainder. Requires `xn < y`.
pub fn div_wvw(z: &mut [Word], xn: Word, x: &[Word], y: Word) -> Word {
    let mut r = xn;
    for i in (0..z.len()).rev() {
        let (q, rr) = div_wide(r, x[i], y);
        z[i] = q;
        r = rr;
    }
    r
}

/// z = (xn:z) / y in place, returning the remainder. Requires `xn < y`.
pub fn div_wvw_in(z: &mut [Word], xn: Word, y: Word) -> Word {
    let mut r = xn;
    for zi in z.iter_mut().rev() {
        let (q, rr) = div_wide(r, *zi, y);
        *zi = q;
        r = rr;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_carry() {
        let (sum, carry) = add_with_carry(u64::MAX, 1, 0);
        assert_eq!(sum, 0);
        assert_eq!(carry, 1);
        assert_eq!(add_with_carry(u64::MAX, u64::MAX, 1), (u64::MAX, 1));
    }

    #[test]
    fn sub_borrow() {
        let (diff, borrow) = sub_with_borrow(0, 1, 0);
        assert_eq!(diff, u64::MAX);
        assert_eq!(borrow, 1);
        assert_eq!(sub_with_borrow(5, 5, 1), (u64::MAX, 1));
        assert_eq!(sub_with_borrow(5, 4, 1), (0, 0));
    }

    #[test]
    fn mul_and_div_wide() {
        let (lo, hi) = mul_wide(u64::MAX, u64::MAX);
        assert_eq!(hi, u64::MAX - 1);
        assert_eq!(lo, 1);
        assert_eq!(div_wide(hi, lo, u64::MAX), (u64::MAX, 0));
        assert_eq!(div_wide(0, 17, 5), (3, 2));
    }

    #[test]
    fn vector_add_sub() {
        let x = [u64::MAX, u64::MAX, 1];
        let y = [1, 0, 0];
        let mut z = [0; 3];
        assert_eq!(add_vv(&mut z, &x, &y), 0);
        assert_eq!(z, [0, 0, 2]);
        assert_eq!(sub_vv_in(&mut z, &y), 0);
        assert_eq!(z, x);
        assert_eq!(sub_vv(&mut z, &y, &x), 1);
    }

    #[test]
    fn scalar_ops_stop_early() {
        let mut data = [u64::MAX, 7, 9];
        assert_eq!(add_scalar(&mut data, 1), 0);
        assert_eq!(data, [0, 8, 9]);
        assert_eq!(sub_scalar(&mut data, 1), 0);
        assert_eq!(data, [u64::MAX, 7, 9]);
        let mut zero = [0u64; 2];
        assert_eq!(sub_scalar(&mut zero, 1), 1);
        assert_eq!(zero, [u64::MAX, u64::MAX]);
    }

    #[test]
    fn shifts_roundtrip() {
        let x = [0x8000_0000_0000_0001, 0x1234];
        let mut z = [0; 2];
        let c = shl_vu(&mut z, &x, 4);
        assert_eq!(c, 0);
        assert_eq!(z, [0x10, 0x12348]);
        let c = shr_vu_in(&mut z, 4);
        assert_eq!(c, 0);
        assert_eq!(z, x);
        let c = shr_vu(&mut z, &x, 1);
        assert_eq!(c, 1 << 63);
        let mut w = x;
        assert_eq!(shl_vu_in(&mut w, 63), 0x1234 >> 1);
    }

    #[test]
    fn mul_add_and_div() {
        let x = [u64::MAX, u64::MAX];
        let mut z = [0; 2];
        let hi = mul_add_vww(&mut z, &x, 10, 3);
        assert_eq!(hi, 9);
        let mut q = [0; 2];
        let r = div_wvw(&mut q, hi, &z, 10);
        assert_eq!(r, 3);
        assert_eq!(q, x);

        let mut acc = [1, 0];
        let c = add_mul_vvw(&mut acc, &x, 2);
        assert_eq!(acc, [u64::MAX, u64::MAX]);
        assert_eq!(c, 1);
    }
}
