//! The external canvas-dimension contract.
//!
//! The engine sizes each tick's destination buffer to whatever the
//! canvas reports *at that instant*; a changed report simply causes a
//! pool miss and a fresh allocation. Buffers are never resized in place.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use petri_grid::GridError;

/// Provider of the current canvas dimensions, read by the coordinator
/// once per tick.
///
/// Implementations may return different values between ticks (a window
/// resize); a zero dimension is tolerated mid-run (the engine keeps the
/// previous generation's shape until the report becomes valid again).
pub trait CanvasSource: Send + Sync {
    /// Current canvas width in cells.
    fn width(&self) -> u32;
    /// Current canvas height in cells.
    fn height(&self) -> u32;
}

/// A canvas whose dimensions never change. The usual choice for
/// headless, benchmark, and test runs.
#[derive(Clone, Copy, Debug)]
pub struct FixedCanvas {
    width: u32,
    height: u32,
}

impl FixedCanvas {
    /// Create a fixed canvas. Zero dimensions are rejected here, per
    /// the configuration-error taxonomy: a run that could never produce
    /// a valid buffer must not start.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid);
        }
        Ok(Self { width, height })
    }
}

impl CanvasSource for FixedCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// A canvas resizable from another thread (e.g. a windowing event loop).
///
/// Cloning yields another handle to the same dimensions; typically one
/// clone goes to the engine and one stays with the event loop calling
/// [`set_size`](Self::set_size).
#[derive(Clone, Debug)]
pub struct SharedCanvas {
    size: Arc<(AtomicU32, AtomicU32)>,
}

impl SharedCanvas {
    /// Create a shared canvas with an initial size. Zero initial
    /// dimensions are rejected; later [`set_size`](Self::set_size) calls
    /// are unchecked because a mid-resize zero report is tolerated.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid);
        }
        Ok(Self {
            size: Arc::new((AtomicU32::new(width), AtomicU32::new(height))),
        })
    }

    /// Publish a new canvas size; the engine picks it up at its next
    /// tick boundary.
    pub fn set_size(&self, width: u32, height: u32) {
        self.size.0.store(width, Ordering::Relaxed);
        self.size.1.store(height, Ordering::Relaxed);
    }
}

impl CanvasSource for SharedCanvas {
    fn width(&self) -> u32 {
        self.size.0.load(Ordering::Relaxed)
    }

    fn height(&self) -> u32 {
        self.size.1.load(Ordering::Relaxed)
    }
}
