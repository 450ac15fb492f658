//! The generation buffer: a fixed-shape 2D field of cell state.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use crate::error::GridError;
use crate::rule::RuleTable;

/// All 8 Moore-neighbourhood offsets: W, E, N, S, NW, SW, NE, SE.
const OFFSETS_8: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// One generation of the universe: a `width x height` field of cells,
/// each carrying a live bit and an age counter (generations of
/// uninterrupted life).
///
/// The shape is fixed for the buffer's lifetime; contents are mutable.
/// Cell storage is column-major (`index = x * height + y`), chosen so a
/// worker assigned a contiguous column range writes a contiguous span of
/// the backing vector.
///
/// # Sharing model
///
/// During a tick, one grid is the frozen `source` (read by every worker)
/// and another is the `dest` (each cell written by exactly one worker,
/// partitions being disjoint). Cells are atomics only so that disjoint
/// concurrent writes are expressible in safe code; every access uses
/// `Ordering::Relaxed`. Cross-thread visibility between ticks is
/// provided by the tick barrier and the handoff channel, both of which
/// impose full happens-before edges.
#[derive(Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    alive: Vec<AtomicBool>,
    age: Vec<AtomicU32>,
    tick: AtomicU64,
}

impl Grid {
    /// Maximum dimension size: coordinates use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create a grid with all cells dead, age 0, and tick 0.
    ///
    /// Returns `Err(GridError::EmptyGrid)` if either dimension is 0, or
    /// `Err(GridError::DimensionTooLarge)` if either exceeds [`MAX_DIM`](Self::MAX_DIM).
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid);
        }
        if width > Self::MAX_DIM {
            return Err(GridError::DimensionTooLarge {
                name: "width",
                value: width,
                max: Self::MAX_DIM,
            });
        }
        if height > Self::MAX_DIM {
            return Err(GridError::DimensionTooLarge {
                name: "height",
                value: height,
                max: Self::MAX_DIM,
            });
        }
        let cells = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            alive: (0..cells).map(|_| AtomicBool::new(false)).collect(),
            age: (0..cells).map(|_| AtomicU32::new(0)).collect(),
            tick: AtomicU64::new(0),
        })
    }

    /// Grid width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells (`width * height`).
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Generation number of this buffer within its lineage.
    ///
    /// Stamped by the tick coordinator when the buffer becomes the write
    /// target; the initial grid of a lineage is generation 0.
    pub fn tick(&self) -> u64 {
        self.tick.load(Ordering::Relaxed)
    }

    /// Stamp the generation number. Called by the coordinator before the
    /// buffer is published as a write target.
    pub fn set_tick(&self, tick: u64) {
        self.tick.store(tick, Ordering::Relaxed);
    }

    /// Column-major index for an in-range coordinate.
    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (x as usize) * (self.height as usize) + (y as usize)
    }

    #[inline]
    fn in_range(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as u32) < self.width && y >= 0 && (y as u32) < self.height
    }

    /// Whether the cell at `(x, y)` is alive.
    ///
    /// Out-of-range coordinates read as dead — this is how the closed,
    /// non-toroidal boundary is realised, not an error.
    #[inline]
    pub fn is_alive(&self, x: i32, y: i32) -> bool {
        if self.in_range(x, y) {
            self.alive[self.index(x as u32, y as u32)].load(Ordering::Relaxed)
        } else {
            false
        }
    }

    /// Age of the cell at `(x, y)`: generations of uninterrupted life.
    ///
    /// Out-of-range coordinates read as 0, mirroring [`is_alive`](Self::is_alive).
    pub fn age(&self, x: i32, y: i32) -> u32 {
        if self.in_range(x, y) {
            self.age[self.index(x as u32, y as u32)].load(Ordering::Relaxed)
        } else {
            0
        }
    }

    /// Set the live bit of a single cell.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of range. Writes outside the grid are a
    /// programming error, unlike reads, which define out-of-range as dead.
    pub fn set_alive(&self, x: u32, y: u32, alive: bool) {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) out of range for {}x{} grid",
            self.width,
            self.height,
        );
        self.alive[self.index(x, y)].store(alive, Ordering::Relaxed);
    }

    /// Number of live Moore neighbours of `(x, y)`, in `[0, 8]`.
    ///
    /// Each out-of-range neighbour counts as dead.
    pub fn neighbour_count(&self, x: i32, y: i32) -> u8 {
        let mut neighbours = 0u8;
        for (dx, dy) in OFFSETS_8 {
            if self.is_alive(x + dx, y + dy) {
                neighbours += 1;
            }
        }
        neighbours
    }

    /// Compute the next state of cell `(x, y)` from `source` under `rule`
    /// and write it into `self`.
    ///
    /// Reads only `source`, never `self` — this is what makes
    /// partition-parallel writes into `self` race-free: destinations are
    /// disjoint per worker, and `source` is frozen for the tick.
    ///
    /// Age increments by one when the cell is alive in both `source` and
    /// the result, and resets to 0 otherwise.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of range for `self`.
    pub fn advance_cell(&self, x: u32, y: u32, source: &Grid, rule: &RuleTable) {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) out of range for {}x{} grid",
            self.width,
            self.height,
        );
        let was_alive = source.is_alive(x as i32, y as i32);
        let neighbours = source.neighbour_count(x as i32, y as i32);
        let alive = rule.next_state(was_alive, neighbours);

        let idx = self.index(x, y);
        self.alive[idx].store(alive, Ordering::Relaxed);
        let age = if was_alive && alive {
            source.age(x as i32, y as i32) + 1
        } else {
            0
        };
        self.age[idx].store(age, Ordering::Relaxed);
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.alive
            .iter()
            .filter(|c| c.load(Ordering::Relaxed))
            .count()
    }

    /// Reset every cell to dead with age 0, keeping the shape and tick.
    ///
    /// Used to discard indeterminate contents (e.g. a buffer abandoned
    /// mid-write) before a buffer re-enters circulation.
    pub fn clear(&self) {
        for cell in &self.alive {
            cell.store(false, Ordering::Relaxed);
        }
        for age in &self.age {
            age.store(0, Ordering::Relaxed);
        }
    }

    /// Advance every cell of `self` from `source` on the calling thread.
    ///
    /// Serial reference path: the engine's workers cover the same cells
    /// via disjoint partitions. Stamps `self`'s tick to `source.tick() + 1`.
    pub fn advance_all(&self, source: &Grid, rule: &RuleTable) {
        self.set_tick(source.tick() + 1);
        for x in 0..self.width {
            for y in 0..self.height {
                self.advance_cell(x, y, source, rule);
            }
        }
    }
}
