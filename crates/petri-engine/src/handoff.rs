//! The consumer side of the bounded generation handoff.
//!
//! Completed grids travel coordinator → consumer through a bounded
//! crossbeam channel (blocking on full: backpressure) and come back as
//! pool recycles when the consumer drops its [`Frame`] guard. Dropping
//! the guard *is* the completion signal — a consumer whose rendering
//! hops to another execution context must hold the guard until that
//! context reports completion, or the buffer could be overwritten while
//! still being read.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use petri_grid::Grid;

use crate::pool::GridPool;

/// A completed generation on loan to the consumer.
///
/// Dereferences to the underlying [`Grid`]. On drop, the buffer returns
/// to the engine's pool for reuse as a later tick's destination. Call
/// [`detach`](Self::detach) instead to keep the grid forever (the engine
/// then allocates a replacement buffer on a later tick).
#[derive(Debug)]
pub struct Frame {
    grid: Option<Arc<Grid>>,
    pool: Arc<GridPool>,
}

impl Frame {
    /// Keep the grid instead of recycling it.
    pub fn detach(mut self) -> Arc<Grid> {
        self.grid.take().expect("frame grid taken only in detach or drop")
    }
}

impl Deref for Frame {
    type Target = Grid;

    fn deref(&self) -> &Grid {
        self.grid
            .as_deref()
            .expect("frame grid taken only in detach or drop")
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        if let Some(grid) = self.grid.take() {
            self.pool.recycle(grid);
        }
    }
}

/// An external collaborator that presents a completed generation.
///
/// `present` must not return until the grid is no longer being read:
/// its return is the completion signal after which the buffer may be
/// recycled. Implementations that schedule work on another execution
/// context must block here on that context's completion.
pub trait RenderSink {
    /// Failure type surfaced out of [`Frames::drain_into`].
    type Error;

    /// Present one completed generation.
    fn present(&mut self, grid: &Grid) -> Result<(), Self::Error>;
}

/// The consumer's handle: a bounded receiver of completed generations
/// plus the pool that loaned-out buffers return to.
///
/// Each grid of a lineage arrives exactly once, in generation order.
/// Dropping `Frames` disconnects the channel, which the coordinator
/// observes as a stop signal on its next enqueue.
#[derive(Debug)]
pub struct Frames {
    rx: Receiver<Arc<Grid>>,
    pool: Arc<GridPool>,
}

impl Frames {
    pub(crate) fn new(rx: Receiver<Arc<Grid>>, pool: Arc<GridPool>) -> Self {
        Self { rx, pool }
    }

    /// Block until the next completed generation, or `None` once the
    /// engine has stopped and the queue is drained.
    pub fn recv(&self) -> Option<Frame> {
        self.rx.recv().ok().map(|grid| Frame {
            grid: Some(grid),
            pool: Arc::clone(&self.pool),
        })
    }

    /// Like [`recv`](Self::recv) with an upper bound on the wait.
    /// `None` on timeout or disconnect.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Frame> {
        match self.rx.recv_timeout(timeout) {
            Ok(grid) => Some(Frame {
                grid: Some(grid),
                pool: Arc::clone(&self.pool),
            }),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Number of completed generations currently queued.
    pub fn queued(&self) -> usize {
        self.rx.len()
    }

    /// Run the standard consumer loop: receive, present, recycle, until
    /// the engine stops or the sink fails.
    ///
    /// On sink failure the undisplayed frame is still recycled before
    /// the error propagates.
    pub fn drain_into<S: RenderSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        while let Some(frame) = self.recv() {
            sink.present(&frame)?;
        }
        Ok(())
    }

    /// Iterate over completed generations until the engine stops.
    pub fn iter(&self) -> impl Iterator<Item = Frame> + '_ {
        std::iter::from_fn(|| self.recv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn fixture(capacity: usize) -> (crossbeam_channel::Sender<Arc<Grid>>, Frames, Arc<GridPool>) {
        let (tx, rx) = bounded(capacity);
        let pool = Arc::new(GridPool::new());
        let frames = Frames::new(rx, Arc::clone(&pool));
        (tx, frames, pool)
    }

    #[test]
    fn dropping_a_frame_recycles_its_buffer() {
        let (tx, frames, pool) = fixture(2);
        tx.send(Arc::new(Grid::new(4, 4).unwrap())).unwrap();
        let frame = frames.recv().unwrap();
        assert_eq!(frame.width(), 4);
        assert!(pool.is_empty());
        drop(frame);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn detached_frames_bypass_the_pool() {
        let (tx, frames, pool) = fixture(2);
        tx.send(Arc::new(Grid::new(4, 4).unwrap())).unwrap();
        let kept = frames.recv().unwrap().detach();
        assert_eq!(kept.width(), 4);
        assert!(pool.is_empty());
    }

    #[test]
    fn recv_returns_none_after_disconnect() {
        let (tx, frames, _pool) = fixture(1);
        drop(tx);
        assert!(frames.recv().is_none());
    }

    #[test]
    fn frames_arrive_in_order() {
        let (tx, frames, _pool) = fixture(3);
        for tick in 1..=3u64 {
            let grid = Grid::new(2, 2).unwrap();
            grid.set_tick(tick);
            tx.send(Arc::new(grid)).unwrap();
        }
        drop(tx);
        let ticks: Vec<u64> = frames.iter().map(|f| f.tick()).collect();
        assert_eq!(ticks, vec![1, 2, 3]);
    }

    #[test]
    fn drain_into_presents_everything_then_ends() {
        struct CountingSink(Vec<u64>);
        impl RenderSink for CountingSink {
            type Error = std::convert::Infallible;
            fn present(&mut self, grid: &Grid) -> Result<(), Self::Error> {
                self.0.push(grid.tick());
                Ok(())
            }
        }

        let (tx, frames, pool) = fixture(4);
        for tick in 0..4u64 {
            let grid = Grid::new(2, 2).unwrap();
            grid.set_tick(tick);
            tx.send(Arc::new(grid)).unwrap();
        }
        drop(tx);
        let mut sink = CountingSink(Vec::new());
        frames.drain_into(&mut sink).unwrap();
        assert_eq!(sink.0, vec![0, 1, 2, 3]);
        assert_eq!(pool.len(), 4);
    }
}
