//! Computation context: thresholds plus the scratch pool.

use std::sync::Arc;

use mparith_memory::WordPool;

use crate::config::Thresholds;

/// Everything an arithmetic routine needs besides its operands.
///
/// Cloning is cheap and clones share the same [`WordPool`], so one pool can
/// serve many threads each holding their own context.
#[derive(Debug, Clone, Default)]
pub struct Context {
    thresholds: Thresholds,
    pool: Arc<WordPool>,
}

impl Context {
    /// Create a context from explicit parts.
    #[must_use]
    pub fn new(thresholds: Thresholds, pool: Arc<WordPool>) -> Self {
        Self { thresholds, pool }
    }

    /// Default pool with the given thresholds.
    #[must_use]
    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        Self::new(thresholds, Arc::default())
    }

    /// Default thresholds with a shared pool.
    #[must_use]
    pub fn with_pool(pool: Arc<WordPool>) -> Self {
        Self::new(Thresholds::default(), pool)
    }

    /// Default thresholds adjusted by `MPARITH_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_thresholds(Thresholds::default().with_env_overrides())
    }

    /// Algorithm crossover points.
    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Scratch buffer pool.
    #[must_use]
    pub fn pool(&self) -> &WordPool {
        &self.pool
    }

    /// Shared handle to the scratch buffer pool.
    #[must_use]
    pub fn shared_pool(&self) -> Arc<WordPool> {
        Arc::clone(&self.pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_pool() {
        let ctx = Context::default();
        let other = ctx.clone();
        other.pool().release(Vec::with_capacity(64));
        assert_eq!(ctx.pool().total_pooled(), 1);
        assert!(Arc::ptr_eq(&ctx.shared_pool(), &other.shared_pool()));
    }

    #[test]
    fn with_thresholds_keeps_values() {
        let t = Thresholds {
            karatsuba: 8,
            ..Thresholds::default()
        };
        assert_eq!(Context::with_thresholds(t).thresholds().karatsuba, 8);
    }
}
