//! Error types for the digit-vector layer.

/// Failure while scanning digits of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// No digits were found where at least one was expected.
    #[error("number has no digits")]
    NoDigits,
    /// An underscore appeared somewhere other than between digits.
    #[error("'_' must separate successive digits")]
    InvalidSeparator,
    /// The requested conversion base is not supported.
    #[error("invalid number base {0}")]
    InvalidBase(u32),
}

/// Failure while loading or validating [`Thresholds`](crate::config::Thresholds).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration is not valid JSON for `Thresholds`.
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// A threshold is outside its supported range.
    #[error("invalid threshold {name}={value}: {reason}")]
    Invalid {
        /// Threshold name.
        name: &'static str,
        /// Rejected value.
        value: usize,
        /// Why the value was rejected.
        reason: &'static str,
    },
}
