//! Error types for integer and float operations.

use mparith_nat::ScanError;

/// A float operation whose result would be NaN under IEEE-754 rules.
///
/// The destination of the failed operation holds `+0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{msg}")]
pub struct NanError {
    msg: &'static str,
}

impl NanError {
    pub(crate) const fn new(msg: &'static str) -> Self {
        Self { msg }
    }

    /// Description of the undefined operation.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.msg
    }
}

/// Failure to parse the text form of an [`Int`](crate::Int) or
/// [`Float`](crate::Float).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input was empty.
    #[error("cannot parse number from empty string")]
    Empty,
    /// The digits themselves were malformed.
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// Text remained after a complete number.
    #[error("expected end of string, found {found:?}")]
    TrailingInput {
        /// The first unconsumed character.
        found: char,
    },
    /// The conversion base is not supported for this type.
    #[error("invalid number base {0}")]
    InvalidBase(u32),
    /// The exponent does not fit the supported range.
    #[error("exponent out of range")]
    ExponentOutOfRange,
    /// Exponent arithmetic overflowed while scaling the mantissa.
    #[error("exponent overflow")]
    ExponentOverflow,
}
