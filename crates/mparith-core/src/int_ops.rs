//! Operator traits and `num-traits` integration for [`Int`].
//!
//! Division and remainder truncate toward zero, like the primitive integer
//! types. Operators that need scratch space run with a default [`Context`];
//! call the methods directly to supply a shared one.

use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};

use mparith_nat::Context;

use crate::error::ParseError;
use crate::int::Int;

/// Implement a binary operator for all owned and borrowed operand pairs,
/// given the `&Int op &Int` body.
macro_rules! int_binop {
    ($Trait:ident, $method:ident, |$z:ident, $x:ident, $y:ident| $body:expr) => {
        impl $Trait<&Int> for &Int {
            type Output = Int;

            fn $method(self, rhs: &Int) -> Int {
                let mut $z = Int::new();
                let ($x, $y) = (self, rhs);
                $body;
                $z
            }
        }

        impl $Trait<Int> for Int {
            type Output = Int;

            fn $method(self, rhs: Int) -> Int {
                $Trait::$method(&self, &rhs)
            }
        }

        impl $Trait<&Int> for Int {
            type Output = Int;

            fn $method(self, rhs: &Int) -> Int {
                $Trait::$method(&self, rhs)
            }
        }

        impl $Trait<Int> for &Int {
            type Output = Int;

            fn $method(self, rhs: Int) -> Int {
                $Trait::$method(self, &rhs)
            }
        }
    };
}

/// Implement `op=` for both operand forms on top of the binary operator.
macro_rules! int_assign_op {
    ($Trait:ident, $method:ident, $Op:ident, $op:ident) => {
        impl $Trait<&Int> for Int {
            fn $method(&mut self, rhs: &Int) {
                *self = $Op::$op(&*self, rhs);
            }
        }

        impl $Trait<Int> for Int {
            fn $method(&mut self, rhs: Int) {
                $Trait::$method(self, &rhs);
            }
        }
    };
}

int_binop!(Add, add, |z, x, y| Int::add(&mut z, x, y));
int_binop!(Sub, sub, |z, x, y| Int::sub(&mut z, x, y));
int_binop!(Mul, mul, |z, x, y| Int::mul(&mut z, x, y, &Context::default()));
int_binop!(Div, div, |z, x, y| Int::quo(&mut z, x, y, &Context::default()));
int_binop!(Rem, rem, |z, x, y| Int::rem(&mut z, x, y, &Context::default()));
int_binop!(BitAnd, bitand, |z, x, y| Int::and(&mut z, x, y));
int_binop!(BitOr, bitor, |z, x, y| Int::or(&mut z, x, y));
int_binop!(BitXor, bitxor, |z, x, y| Int::xor(&mut z, x, y));

int_assign_op!(MulAssign, mul_assign, Mul, mul);
int_assign_op!(DivAssign, div_assign, Div, div);
int_assign_op!(RemAssign, rem_assign, Rem, rem);
int_assign_op!(BitAndAssign, bitand_assign, BitAnd, bitand);
int_assign_op!(BitOrAssign, bitor_assign, BitOr, bitor);
int_assign_op!(BitXorAssign, bitxor_assign, BitXor, bitxor);

// += and -= on &Int work in place and live next to the type.
impl AddAssign<Int> for Int {
    fn add_assign(&mut self, rhs: Int) {
        *self += &rhs;
    }
}

impl SubAssign<Int> for Int {
    fn sub_assign(&mut self, rhs: Int) {
        *self -= &rhs;
    }
}

impl Neg for &Int {
    type Output = Int;

    fn neg(self) -> Int {
        let mut z = Int::new();
        Int::neg(&mut z, self);
        z
    }
}

impl Neg for Int {
    type Output = Int;

    fn neg(mut self) -> Int {
        self.neg = !self.neg && !self.abs.is_zero();
        self
    }
}

impl Not for &Int {
    type Output = Int;

    fn not(self) -> Int {
        let mut z = Int::new();
        Int::not(&mut z, self);
        z
    }
}

impl Not for Int {
    type Output = Int;

    fn not(self) -> Int {
        Not::not(&self)
    }
}

impl Shl<usize> for &Int {
    type Output = Int;

    fn shl(self, n: usize) -> Int {
        let mut z = Int::new();
        Int::shl(&mut z, self, n);
        z
    }
}

impl Shl<usize> for Int {
    type Output = Int;

    fn shl(self, n: usize) -> Int {
        Shl::shl(&self, n)
    }
}

impl Shr<usize> for &Int {
    type Output = Int;

    fn shr(self, n: usize) -> Int {
        let mut z = Int::new();
        Int::shr(&mut z, self, n);
        z
    }
}

impl Shr<usize> for Int {
    type Output = Int;

    fn shr(self, n: usize) -> Int {
        Shr::shr(&self, n)
    }
}

impl ShlAssign<usize> for Int {
    fn shl_assign(&mut self, n: usize) {
        self.abs.shl_assign(n);
    }
}

impl ShrAssign<usize> for Int {
    fn shr_assign(&mut self, n: usize) {
        *self = Shr::shr(&*self, n);
    }
}

impl num_traits::Zero for Int {
    fn zero() -> Self {
        Int::new()
    }

    fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }
}

impl num_traits::One for Int {
    fn one() -> Self {
        Int::from_u64(1)
    }
}

impl num_traits::Num for Int {
    type FromStrRadixErr = ParseError;

    fn from_str_radix(s: &str, radix: u32) -> Result<Self, ParseError> {
        Int::from_str_radix(s, radix)
    }
}

impl num_traits::ToPrimitive for Int {
    fn to_i64(&self) -> Option<i64> {
        Int::to_i64(self)
    }

    fn to_u64(&self) -> Option<u64> {
        Int::to_u64(self)
    }
}

#[cfg(feature = "num-bigint")]
mod bigint {
    use mparith_nat::Nat;
    use num_bigint::{BigInt, BigUint, Sign};

    use crate::int::Int;

    impl From<&BigInt> for Int {
        fn from(x: &BigInt) -> Self {
            let (sign, digits) = x.to_u64_digits();
            Int::from_parts(sign == Sign::Minus, Nat::from_words(digits))
        }
    }

    impl From<BigInt> for Int {
        fn from(x: BigInt) -> Self {
            Int::from(&x)
        }
    }

    impl From<&Int> for BigInt {
        fn from(x: &Int) -> Self {
            let mag = BigUint::from_bytes_be(&x.to_bytes_be());
            let sign = if x.is_negative() { Sign::Minus } else { Sign::Plus };
            BigInt::from_biguint(sign, mag)
        }
    }

    impl From<Int> for BigInt {
        fn from(x: Int) -> Self {
            BigInt::from(&x)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::{Num, One, ToPrimitive, Zero};

    fn int(x: i64) -> Int {
        Int::from_i64(x)
    }

    #[test]
    fn operators_follow_primitive_semantics() {
        let pairs = [(17, 5), (-17, 5), (17, -5), (-17, -5), (0, 3), (12, 4)];
        for (a, b) in pairs {
            let (x, y) = (int(a), int(b));
            assert_eq!(&x + &y, int(a + b));
            assert_eq!(&x - &y, int(a - b));
            assert_eq!(&x * &y, int(a * b));
            assert_eq!(&x / &y, int(a / b), "{a} / {b}");
            assert_eq!(&x % &y, int(a % b), "{a} % {b}");
            assert_eq!(&x & &y, int(a & b));
            assert_eq!(&x | &y, int(a | b));
            assert_eq!(&x ^ &y, int(a ^ b));
            assert_eq!(-&x, int(-a));
            assert_eq!(!&x, int(!a));
            assert_eq!(&x << 3, int(a << 3));
            assert_eq!(&x >> 2, int(a >> 2));
        }
    }

    #[test]
    fn assignment_forms() {
        let mut x = int(10);
        x += int(5);
        x -= &int(20);
        assert_eq!(x, int(-5));
        x *= int(-6);
        x /= &int(4);
        assert_eq!(x, int(7));
        x %= int(4);
        assert_eq!(x, int(3));
        x <<= 4;
        x >>= 1;
        assert_eq!(x, int(24));
        x |= int(1);
        x &= int(0b11001);
        x ^= int(0b10000);
        assert_eq!(x, int(0b01001));
        assert_eq!(-Int::new(), Int::new());
        assert_eq!(-int(4), int(-4));
    }

    #[test]
    fn num_traits() {
        assert!(Int::zero().is_zero());
        assert_eq!(Int::one(), int(1));
        assert_eq!(<Int as Num>::from_str_radix("-ff", 16).unwrap(), int(-255));
        assert_eq!(ToPrimitive::to_i32(&int(-7)), Some(-7));
        assert_eq!(ToPrimitive::to_u8(&int(300)), None);
    }

    #[cfg(feature = "num-bigint")]
    #[test]
    fn bigint_round_trip() {
        let x: Int = "-98765432109876543210987654321".parse().unwrap();
        let b = num_bigint::BigInt::from(&x);
        assert_eq!(b.to_string(), x.to_string());
        assert_eq!(Int::from(b), x);
    }
}
