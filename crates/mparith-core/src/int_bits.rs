//! Shifts and bitwise logic on [`Int`] with two's complement semantics.
//!
//! Negative values behave as if they had an infinite run of leading one
//! bits. With sign and magnitude this comes down to the identity
//! `-x == !(x-1)`, so each operation works on `|x|-1` for negative
//! operands and maps the result back.

use mparith_nat::Nat;

use crate::int::Int;

/// |x| - 1 for a non-zero magnitude.
fn minus_one(x: &Nat) -> Nat {
    let mut t = x.clone();
    t.sub_word_assign(1);
    t
}

impl Int {
    /// self = x << n.
    pub fn shl(&mut self, x: &Int, n: usize) {
        self.abs.shl(&x.abs, n);
        self.neg = x.neg;
    }

    /// self = x >> n, rounding toward negative infinity.
    pub fn shr(&mut self, x: &Int, n: usize) {
        if x.neg {
            // (-x) >> n == !(x-1) >> n == !((x-1) >> n) == -(((x-1) >> n) + 1)
            self.abs.shr(&minus_one(&x.abs), n);
            self.abs.add_word_assign(1);
            self.neg = true;
            return;
        }
        self.abs.shr(&x.abs, n);
        self.neg = false;
    }

    /// Bit `i` of the two's complement form, `(self >> i) & 1`.
    #[must_use]
    pub fn bit(&self, i: usize) -> u32 {
        if i == 0 {
            // the parity is the same for -x
            return self.abs.bit(0);
        }
        if self.neg {
            return minus_one(&self.abs).bit(i) ^ 1;
        }
        self.abs.bit(i)
    }

    /// self = x with bit `i` set to `b`: `x | 1<<i` or `x & !(1<<i)`.
    pub fn set_bit(&mut self, x: &Int, i: usize, b: bool) {
        if x.neg {
            let t = minus_one(&x.abs);
            self.abs.set_bit(&t, i, !b);
            self.abs.add_word_assign(1);
            self.neg = !self.abs.is_zero();
            return;
        }
        self.abs.set_bit(&x.abs, i, b);
        self.neg = false;
    }

    /// self = x & y.
    pub fn and(&mut self, x: &Int, y: &Int) {
        if x.neg == y.neg {
            if x.neg {
                // (-x) & (-y) == !(x-1) & !(y-1) == !((x-1) | (y-1)) == -(((x-1) | (y-1)) + 1)
                self.abs.or(&minus_one(&x.abs), &minus_one(&y.abs));
                self.abs.add_word_assign(1);
                self.neg = true;
                return;
            }
            self.abs.and(&x.abs, &y.abs);
            self.neg = false;
            return;
        }

        let (x, y) = if x.neg { (y, x) } else { (x, y) };
        // x & (-y) == x & !(y-1)
        self.abs.and_not(&x.abs, &minus_one(&y.abs));
        self.neg = false;
    }

    /// self = x & !y.
    pub fn and_not(&mut self, x: &Int, y: &Int) {
        if x.neg == y.neg {
            if x.neg {
                // (-x) & !(-y) == !(x-1) & (y-1) == (y-1) & !(x-1)
                self.abs.and_not(&minus_one(&y.abs), &minus_one(&x.abs));
                self.neg = false;
                return;
            }
            self.abs.and_not(&x.abs, &y.abs);
            self.neg = false;
            return;
        }

        if x.neg {
            // (-x) & !y == !(x-1) & !y == !((x-1) | y) == -(((x-1) | y) + 1)
            self.abs.or(&minus_one(&x.abs), &y.abs);
            self.abs.add_word_assign(1);
            self.neg = true;
            return;
        }

        // x & !(-y) == x & (y-1)
        self.abs.and(&x.abs, &minus_one(&y.abs));
        self.neg = false;
    }

    /// self = x | y.
    pub fn or(&mut self, x: &Int, y: &Int) {
        if x.neg == y.neg {
            if x.neg {
                // (-x) | (-y) == !((x-1) & (y-1)) == -(((x-1) & (y-1)) + 1)
                self.abs.and(&minus_one(&x.abs), &minus_one(&y.abs));
                self.abs.add_word_assign(1);
                self.neg = true;
                return;
            }
            self.abs.or(&x.abs, &y.abs);
            self.neg = false;
            return;
        }

        let (x, y) = if x.neg { (y, x) } else { (x, y) };
        // x | (-y) == x | !(y-1) == !((y-1) & !x) == -(((y-1) & !x) + 1)
        self.abs.and_not(&minus_one(&y.abs), &x.abs);
        self.abs.add_word_assign(1);
        self.neg = true;
    }

    /// self = x ^ y.
    pub fn xor(&mut self, x: &Int, y: &Int) {
        if x.neg == y.neg {
            if x.neg {
                // (-x) ^ (-y) == !(x-1) ^ !(y-1) == (x-1) ^ (y-1)
                self.abs.xor(&minus_one(&x.abs), &minus_one(&y.abs));
            } else {
                self.abs.xor(&x.abs, &y.abs);
            }
            self.neg = false;
            return;
        }

        let (x, y) = if x.neg { (y, x) } else { (x, y) };
        // x ^ (-y) == x ^ !(y-1) == -((x ^ (y-1)) + 1)
        self.abs.xor(&x.abs, &minus_one(&y.abs));
        self.abs.add_word_assign(1);
        self.neg = true;
    }

    /// self = !x, that is `-x - 1`.
    pub fn not(&mut self, x: &Int) {
        if x.neg {
            // !(-x) == !!(x-1) == x-1
            self.abs = minus_one(&x.abs);
            self.neg = false;
            return;
        }
        // !x == -(x+1)
        self.abs.set(&x.abs);
        self.abs.add_word_assign(1);
        self.neg = true;
    }
}
