//! Word-buffer pool with size classes for scratch reuse.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::stats::{AtomicPoolStats, PoolStats};

/// Smallest size class, in words.
const MIN_CLASS: usize = 16;

/// Pool of `Vec<u64>` scratch buffers, organized by size class (power of 4).
///
/// Buffers handed out by [`acquire`](Self::acquire) are exclusively owned by
/// the caller until they are given back with [`release`](Self::release).
/// The pool only guards its free lists; it never shares a checked-out buffer.
pub struct WordPool {
    pools: Mutex<HashMap<usize, Vec<Vec<u64>>>>,
    max_words: usize,
    max_per_class: usize,
    stats: AtomicPoolStats,
}

impl WordPool {
    /// Create a new pool.
    ///
    /// Buffers with more than `max_words` words of capacity are never kept,
    /// and each size class holds at most `max_per_class` buffers.
    #[must_use]
    pub fn new(max_words: usize, max_per_class: usize) -> Self {
        Self {
            pools: Mutex::new(HashMap::new()),
            max_words,
            max_per_class,
            stats: AtomicPoolStats::new(),
        }
    }

    /// Get a zeroed buffer of exactly `len` words, reusing pooled storage
    /// when a buffer of a suitable class is available.
    pub fn acquire(&self, len: usize) -> Vec<u64> {
        let class = Self::size_class(len);
        let pooled = self.pools.lock().get_mut(&class).and_then(Vec::pop);
        let mut buf = if let Some(buf) = pooled {
            self.stats.record_hit();
            buf
        } else {
            self.stats.record_miss();
            Vec::with_capacity(if class <= self.max_words { class } else { len })
        };
        buf.clear();
        buf.resize(len, 0);
        buf
    }

    /// Return a buffer to the pool.
    pub fn release(&self, buf: Vec<u64>) {
        let cap = buf.capacity();
        if cap > self.max_words || cap < MIN_CLASS {
            self.stats.record_eviction();
            tracing::trace!(capacity = cap, "scratch buffer not pooled");
            return;
        }

        let class = Self::class_for_capacity(cap);
        let mut pools = self.pools.lock();
        let pool = pools.entry(class).or_default();
        if pool.len() < self.max_per_class {
            pool.push(buf);
        } else {
            self.stats.record_eviction();
        }
    }

    /// Compute size class (round up to next power of 4, at least 16 words).
    fn size_class(words: usize) -> usize {
        let mut class = MIN_CLASS;
        while class < words {
            class *= 4;
        }
        class
    }

    /// Largest size class that a buffer of `cap` words can serve.
    fn class_for_capacity(cap: usize) -> usize {
        let mut class = MIN_CLASS;
        while class * 4 <= cap {
            class *= 4;
        }
        class
    }

    /// Get total number of pooled buffers.
    #[must_use]
    pub fn total_pooled(&self) -> usize {
        self.pools.lock().values().map(Vec::len).sum()
    }

    /// Get a snapshot of pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }

    /// Reset pool statistics counters.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Clear all pooled buffers, releasing memory.
    pub fn clear(&self) {
        self.pools.lock().clear();
    }

    /// Pre-populate the size class serving `words` with `count` buffers.
    ///
    /// Classes larger than `max_words` are never pooled and stay empty.
    pub fn warm(&self, words: usize, count: usize) {
        let class = Self::size_class(words);
        if class > self.max_words {
            tracing::trace!(class, max_words = self.max_words, "size class not pooled");
            return;
        }
        let mut pools = self.pools.lock();
        let pool = pools.entry(class).or_default();
        let to_add = count
            .saturating_sub(pool.len())
            .min(self.max_per_class.saturating_sub(pool.len()));
        for _ in 0..to_add {
            pool.push(Vec::with_capacity(class));
        }
    }
}

impl Default for WordPool {
    fn default() -> Self {
        Self::new(1 << 24, 32)
    }
}

impl std::fmt::Debug for WordPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordPool")
            .field("max_words", &self.max_words)
            .field("max_per_class", &self.max_per_class)
            .field("total_pooled", &self.total_pooled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_acquire_release() {
        let pool = WordPool::default();
        let buf = pool.acquire(100);
        assert_eq!(buf.len(), 100);
        assert!(buf.iter().all(|&w| w == 0));
        pool.release(buf);
        assert_eq!(pool.total_pooled(), 1);
    }

    #[test]
    fn size_class_computation() {
        assert_eq!(WordPool::size_class(0), 16);
        assert_eq!(WordPool::size_class(16), 16);
        assert_eq!(WordPool::size_class(17), 64);
        assert_eq!(WordPool::size_class(64), 64);
        assert_eq!(WordPool::size_class(65), 256);
    }

    #[test]
    fn class_for_capacity_rounds_down() {
        assert_eq!(WordPool::class_for_capacity(16), 16);
        assert_eq!(WordPool::class_for_capacity(63), 16);
        assert_eq!(WordPool::class_for_capacity(64), 64);
        assert_eq!(WordPool::class_for_capacity(300), 256);
    }

    #[test]
    fn reused_buffer_is_zeroed() {
        let pool = WordPool::default();
        let mut buf = pool.acquire(20);
        buf.iter_mut().for_each(|w| *w = u64::MAX);
        pool.release(buf);
        let buf = pool.acquire(30);
        assert_eq!(buf.len(), 30);
        assert!(buf.iter().all(|&w| w == 0));
        assert!(buf.capacity() >= 64);
    }

    #[test]
    fn pool_stats_tracking() {
        let pool = WordPool::default();

        // Miss: nothing in pool
        let buf = pool.acquire(40);
        let stats = pool.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);

        // Release and re-acquire from same class: should be a hit
        pool.release(buf);
        let _ = pool.acquire(50);
        let stats = pool.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn pool_stats_eviction_too_large() {
        let pool = WordPool::new(64, 4);
        pool.release(Vec::with_capacity(1024));
        assert_eq!(pool.stats().evictions, 1);
        assert_eq!(pool.total_pooled(), 0);
    }

    #[test]
    fn warm_skips_classes_above_max_words() {
        let pool = WordPool::new(64, 4);
        pool.warm(65, 3);
        assert_eq!(pool.total_pooled(), 0);
        pool.warm(64, 3);
        assert_eq!(pool.total_pooled(), 3);

        // a warmed buffer is handed out as a hit
        let _ = pool.acquire(50);
        assert_eq!(pool.stats().hits, 1);
    }

    #[test]
    fn pool_stats_eviction_too_small() {
        let pool = WordPool::default();
        pool.release(vec![0; 3]);
        assert_eq!(pool.stats().evictions, 1);
    }

    #[test]
    fn pool_stats_eviction_pool_full() {
        let pool = WordPool::new(100_000, 2);
        pool.release(Vec::with_capacity(16));
        pool.release(Vec::with_capacity(16));
        pool.release(Vec::with_capacity(16)); // class 16 is full
        assert_eq!(pool.stats().evictions, 1);
    }

    #[test]
    fn pool_stats_reset() {
        let pool = WordPool::default();
        let _ = pool.acquire(100);
        pool.reset_stats();
        let stats = pool.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn pool_clear() {
        let pool = WordPool::default();
        pool.release(Vec::with_capacity(16));
        pool.release(Vec::with_capacity(64));
        assert_eq!(pool.total_pooled(), 2);
        pool.clear();
        assert_eq!(pool.total_pooled(), 0);
    }

    #[test]
    fn pool_warm() {
        let pool = WordPool::default();
        pool.warm(1000, 5);
        assert_eq!(pool.total_pooled(), 5);

        // Warming again should not add duplicates beyond count
        pool.warm(1000, 5);
        assert_eq!(pool.total_pooled(), 5);

        pool.warm(1000, 8);
        assert_eq!(pool.total_pooled(), 8);

        let buf = pool.acquire(1000);
        assert!(buf.capacity() >= 1000);
        assert_eq!(pool.stats().hits, 1);
    }

    #[test]
    fn concurrent_acquire_release() {
        use rayon::prelude::*;

        let pool = WordPool::default();
        (0..256usize).into_par_iter().for_each(|i| {
            let len = 1 + (i % 7) * 40;
            let mut buf = pool.acquire(len);
            assert_eq!(buf.len(), len);
            assert!(buf.iter().all(|&w| w == 0));
            buf[0] = i as u64;
            pool.release(buf);
        });
        let stats = pool.stats();
        assert_eq!(stats.hits + stats.misses, 256);
    }
}
