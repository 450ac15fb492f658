//! Engine counters: generation throughput and buffer-pool behaviour.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters updated by the coordinator action. Internal; readers
/// take [`snapshot`](Counters::snapshot).
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub generations: AtomicU64,
    pub buffers_allocated: AtomicU64,
    pub pool_hits: AtomicU64,
}

impl Counters {
    pub fn snapshot(&self) -> EngineMetrics {
        EngineMetrics {
            generations: self.generations.load(Ordering::Relaxed),
            buffers_allocated: self.buffers_allocated.load(Ordering::Relaxed),
            pool_hits: self.pool_hits.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of engine counters.
///
/// Every tick's destination buffer came from the pool or from a fresh
/// allocation, so `pool_hits + buffers_allocated` tracks `generations`
/// (the buffer for the in-flight tick may already be counted before its
/// generation completes). A healthy steady state has `buffers_allocated`
/// frozen at a small constant while `pool_hits` tracks `generations`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineMetrics {
    /// Completed generations handed to the consumer.
    pub generations: u64,
    /// Destination buffers allocated fresh (pool misses, including the
    /// first tick and every canvas resize).
    pub buffers_allocated: u64,
    /// Destination buffers reused from the pool.
    pub pool_hits: u64,
}
