//! Buffer reuse: retired grids waiting to become a tick's destination.
//!
//! A full generation buffer is `width * height` cells of state; the pool
//! exists so a stable-size run allocates a handful of buffers total
//! instead of one per tick. This is a deliberate resource-management
//! decision, not a cache that may be skipped.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use petri_grid::Grid;

/// An order-insensitive cache of retired [`Grid`] buffers, keyed only by
/// exact `(width, height)` match on the way out.
///
/// Buffers are never resized: after a canvas resize, stale-shaped
/// entries are simply dropped during [`acquire`](Self::acquire) and
/// fresh buffers are allocated at the new size.
#[derive(Debug, Default)]
pub struct GridPool {
    cache: Mutex<VecDeque<Arc<Grid>>>,
}

impl GridPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop a retired buffer of exactly `width x height`, discarding any
    /// differently shaped entries encountered on the way.
    ///
    /// Returns `None` when no matching buffer is pooled; the caller
    /// allocates fresh.
    pub fn acquire(&self, width: u32, height: u32) -> Option<Arc<Grid>> {
        let mut cache = self.cache.lock().unwrap();
        while let Some(grid) = cache.pop_front() {
            if grid.width() == width && grid.height() == height {
                // The pool must hold the only reference: a buffer still
                // visible to a reader must never become a write target.
                debug_assert_eq!(
                    Arc::strong_count(&grid),
                    1,
                    "pooled grid still referenced outside the pool"
                );
                return Some(grid);
            }
            // Stale shape from before a resize; dropped, never resized.
        }
        None
    }

    /// Hand a buffer back for reuse.
    ///
    /// The caller must be surrendering its only reference — recycling a
    /// grid while it is still being read elsewhere is a use-after-
    /// handback and the next tick would overwrite it mid-read.
    pub fn recycle(&self, grid: Arc<Grid>) {
        self.cache.lock().unwrap().push_back(grid);
    }

    /// Number of pooled buffers.
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(w: u32, h: u32) -> Arc<Grid> {
        Arc::new(Grid::new(w, h).unwrap())
    }

    #[test]
    fn acquire_on_empty_pool_misses() {
        let pool = GridPool::new();
        assert!(pool.acquire(8, 8).is_none());
    }

    #[test]
    fn recycle_then_acquire_reuses_buffer() {
        let pool = GridPool::new();
        let g = grid(8, 8);
        let ptr = Arc::as_ptr(&g);
        pool.recycle(g);
        let reused = pool.acquire(8, 8).unwrap();
        assert_eq!(Arc::as_ptr(&reused), ptr);
        assert!(pool.is_empty());
    }

    #[test]
    fn mismatched_shapes_are_discarded() {
        let pool = GridPool::new();
        pool.recycle(grid(4, 4));
        pool.recycle(grid(6, 6));
        pool.recycle(grid(8, 8));
        // Acquiring 8x8 walks past (and drops) the two stale shapes.
        assert!(pool.acquire(8, 8).is_some());
        assert!(pool.is_empty());
    }

    #[test]
    fn mismatch_only_pool_drains_to_a_miss() {
        let pool = GridPool::new();
        pool.recycle(grid(4, 4));
        assert!(pool.acquire(5, 5).is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn steady_state_reuse_allocates_nothing() {
        // The coordinator pattern: acquire-or-allocate, retire, recycle.
        // With a prompt consumer, a stable-size run settles on two
        // buffers that ping-pong through the pool forever.
        let pool = GridPool::new();
        let mut allocated = 0usize;
        let mut current = {
            allocated += 1;
            grid(16, 16)
        };
        for _ in 0..100 {
            let next = pool.acquire(16, 16).unwrap_or_else(|| {
                allocated += 1;
                grid(16, 16)
            });
            let completed = std::mem::replace(&mut current, next);
            // Consumer renders `completed` and hands it straight back.
            pool.recycle(completed);
        }
        assert_eq!(allocated, 2);
    }
}
