//! Deterministic, load-balanced splitting of the grid's columns across a
//! fixed worker pool.

/// A contiguous half-open column range `[start, end)` assigned to one
/// worker for one tick.
///
/// For a given `(total, workers)` pair, the per-worker partitions are
/// pairwise disjoint, jointly cover `[0, total)`, and differ in length by
/// at most one: each worker gets `total / workers` columns, and the
/// `total % workers` leftover columns go one each to the lowest-indexed
/// workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    /// First column owned by the worker (inclusive).
    pub start: u32,
    /// One past the last column owned by the worker.
    pub end: u32,
}

impl Partition {
    /// Compute the partition of `total` columns owned by worker `index`
    /// out of `workers`.
    ///
    /// Recomputed per tick against the current destination grid, so a
    /// canvas resize between ticks changes every worker's bounds
    /// consistently.
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0` or `index >= workers` (both are engine
    /// configuration bugs, rejected long before the tick loop).
    pub fn for_worker(total: u32, workers: u32, index: u32) -> Self {
        assert!(workers > 0, "worker count must be at least 1");
        assert!(index < workers, "worker index {index} out of range for {workers} workers");
        let base = total / workers;
        let remainder = total % workers;
        let start = index * base + index.min(remainder);
        let end = start + base + u32::from(index < remainder);
        Self { start, end }
    }

    /// Number of columns in the partition.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the partition owns no columns (more workers than columns).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
