//! # mparith-nat
//!
//! Unsigned multi-precision integers stored as little-endian `u64` words.
//!
//! [`Nat`] is the bottom layer of the mparith stack: schoolbook and
//! Karatsuba multiplication, Knuth and Burnikel-Ziegler division, modular
//! exponentiation (Montgomery for odd moduli), integer square roots and
//! text conversion in bases up to 62. Operations that need scratch space
//! take a [`Context`], which carries the algorithm [`Thresholds`] and a
//! shared [`WordPool`](mparith_memory::WordPool).
#![warn(missing_docs)]

pub mod arith;
pub mod config;
pub mod context;
pub mod conv;
mod div;
pub mod error;
mod exp;
mod mul;
pub mod nat;

pub use arith::{Word, WORD_BITS};
pub use config::Thresholds;
pub use context::Context;
pub use conv::{Scanner, MAX_BASE};
pub use error::{ConfigError, ScanError};
pub use nat::Nat;
