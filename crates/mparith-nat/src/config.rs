//! Algorithm crossover thresholds.
//!
//! Defaults are the empirically tuned values for 64-bit words. They can be
//! replaced from a JSON profile or overridden per variable from the
//! environment, mirroring how a calibration run would persist its results.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Operand length (in words) at or above which multiplication uses Karatsuba.
pub const DEFAULT_KARATSUBA_THRESHOLD: usize = 40;

/// Operand length (in words) at or above which squaring uses the dedicated
/// schoolbook squaring instead of general multiplication.
pub const DEFAULT_BASIC_SQR_THRESHOLD: usize = 20;

/// Operand length (in words) at or above which squaring uses Karatsuba.
pub const DEFAULT_KARATSUBA_SQR_THRESHOLD: usize = 260;

/// Divisor length (in words) at or above which division is recursive.
pub const DEFAULT_DIV_RECURSIVE_THRESHOLD: usize = 100;

const ENV_KARATSUBA: &str = "MPARITH_KARATSUBA_THRESHOLD";
const ENV_BASIC_SQR: &str = "MPARITH_BASIC_SQR_THRESHOLD";
const ENV_KARATSUBA_SQR: &str = "MPARITH_KARATSUBA_SQR_THRESHOLD";
const ENV_DIV_RECURSIVE: &str = "MPARITH_DIV_RECURSIVE_THRESHOLD";

/// Crossover points between the schoolbook and divide-and-conquer algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Karatsuba multiplication threshold.
    pub karatsuba: usize,
    /// Schoolbook squaring threshold.
    pub basic_sqr: usize,
    /// Karatsuba squaring threshold.
    pub karatsuba_sqr: usize,
    /// Burnikel-Ziegler division threshold.
    pub div_recursive: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            karatsuba: DEFAULT_KARATSUBA_THRESHOLD,
            basic_sqr: DEFAULT_BASIC_SQR_THRESHOLD,
            karatsuba_sqr: DEFAULT_KARATSUBA_SQR_THRESHOLD,
            div_recursive: DEFAULT_DIV_RECURSIVE_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Check that every threshold keeps its algorithm well defined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.karatsuba < 2 {
            return Err(ConfigError::Invalid {
                name: "karatsuba",
                value: self.karatsuba,
                reason: "must be at least 2",
            });
        }
        if self.karatsuba_sqr < 2 {
            return Err(ConfigError::Invalid {
                name: "karatsuba_sqr",
                value: self.karatsuba_sqr,
                reason: "must be at least 2",
            });
        }
        if self.basic_sqr > self.karatsuba_sqr {
            return Err(ConfigError::Invalid {
                name: "basic_sqr",
                value: self.basic_sqr,
                reason: "must not exceed karatsuba_sqr",
            });
        }
        // recursive division halves the divisor and needs room on both sides
        if self.div_recursive < 8 {
            return Err(ConfigError::Invalid {
                name: "div_recursive",
                value: self.div_recursive,
                reason: "must be at least 8",
            });
        }
        Ok(())
    }

    /// Parse and validate thresholds from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let t: Self = serde_json::from_str(json)?;
        t.validate()?;
        Ok(t)
    }

    /// Load thresholds from a JSON file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let t = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), ?t, "loaded thresholds");
        Ok(t)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Apply `MPARITH_*_THRESHOLD` environment overrides.
    ///
    /// Unparsable values are ignored with a warning. If the combined result
    /// fails validation, the thresholds are returned unchanged.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut t = self;
        for (name, slot) in [
            (ENV_KARATSUBA, &mut t.karatsuba),
            (ENV_BASIC_SQR, &mut t.basic_sqr),
            (ENV_KARATSUBA_SQR, &mut t.karatsuba_sqr),
            (ENV_DIV_RECURSIVE, &mut t.div_recursive),
        ] {
            let Some(raw) = lookup(name) else { continue };
            match raw.trim().parse::<usize>() {
                Ok(v) => {
                    tracing::debug!(name, value = v, "threshold override");
                    *slot = v;
                }
                Err(err) => tracing::warn!(name, raw = %raw, %err, "ignoring threshold override"),
            }
        }
        match t.validate() {
            Ok(()) => t,
            Err(err) => {
                tracing::warn!(%err, "threshold overrides rejected, keeping previous values");
                self
            }
        }
    }
}
