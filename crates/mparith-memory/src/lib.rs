//! # mparith-memory
//!
//! Scratch memory for the mparith workspace.
//!
//! Provides a size-classed pool of word buffers that multiplication,
//! division and GCD routines borrow temporaries from. The pool is an
//! ordinary value: callers create one, share it behind an `Arc`, and
//! hand it to the arithmetic layer through a computation context.
#![warn(missing_docs)]

pub mod pool;
pub mod stats;

pub use pool::WordPool;
pub use stats::PoolStats;
