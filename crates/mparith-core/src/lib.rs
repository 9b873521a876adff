//! # mparith-core
//!
//! Signed integers and arbitrary-precision binary floating point built on
//! the [`Nat`](mparith_nat::Nat) digit vectors of `mparith-nat`.
//!
//! [`Int`] is a sign and magnitude integer with truncated and Euclidean
//! division, two's complement bit logic, GCD and number theory. [`Float`]
//! carries its own precision and [`RoundingMode`] and rounds every result
//! exactly once, reporting the direction of the error as an [`Accuracy`].
//!
//! Operations write into a destination (`z.add(&x, &y)`), so buffers are
//! reused across calls. Anything that needs scratch storage takes a
//! [`Context`](mparith_nat::Context).
//!
//! ```
//! use mparith_core::{Float, Int, RoundingMode};
//! use mparith_nat::Context;
//!
//! let ctx = Context::default();
//! let mut z = Int::new();
//! z.mul(&Int::from_i64(-7), &Int::from_i64(6), &ctx);
//! assert_eq!(z.to_string(), "-42");
//!
//! let (x, _) = Float::parse_float("0x1.8p1", 0, 53, RoundingMode::ToNearestEven, &ctx).unwrap();
//! assert_eq!(x.to_f64().0, 3.0);
//! ```
#![warn(missing_docs)]

pub(crate) mod decimal;
pub mod error;
pub mod float;
mod float_arith;
mod float_conv;
mod float_format;
mod float_parse;
pub mod int;
mod int_bits;
pub(crate) mod int_conv;
mod int_gcd;
mod int_ops;
mod int_theory;

pub use error::{NanError, ParseError};
pub use float::{Accuracy, Float, RoundingMode, MAX_EXP, MAX_PREC, MIN_EXP};
pub use int::Int;
