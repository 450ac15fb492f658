//! Population of freshly allocated grids from generator predicates and
//! line-oriented pattern text.

use rand::Rng;

use crate::error::GridError;
use crate::grid::Grid;

/// Allocate a grid and set each cell alive iff `predicate(x, y)` holds.
///
/// Deterministic for deterministic predicates; the predicate is invoked
/// exactly once per cell, columns outermost.
pub fn generate<F>(width: u32, height: u32, mut predicate: F) -> Result<Grid, GridError>
where
    F: FnMut(u32, u32) -> bool,
{
    let grid = Grid::new(width, height)?;
    for x in 0..width {
        for y in 0..height {
            if predicate(x, y) {
                grid.set_alive(x, y, true);
            }
        }
    }
    Ok(grid)
}

/// Each cell is alive with probability 1/2, drawn from `rng`.
///
/// Seed the RNG (e.g. `ChaCha8Rng::seed_from_u64`) for a reproducible
/// initial population.
pub fn random<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> Result<Grid, GridError> {
    generate(width, height, |_, _| rng.gen::<bool>())
}

/// Horizontal stripes: every cell on a row where `y % stride == 0` is alive.
pub fn striped(width: u32, height: u32, stride: u32) -> Result<Grid, GridError> {
    if stride == 0 {
        return Err(GridError::ZeroStride);
    }
    generate(width, height, |_, y| y % stride == 0)
}

/// A lattice of crossing lines with gaps at the crossings:
/// `x % stride == 0 XOR y % stride == 0`.
pub fn lattice(width: u32, height: u32, stride: u32) -> Result<Grid, GridError> {
    if stride == 0 {
        return Err(GridError::ZeroStride);
    }
    generate(width, height, |x, y| (x % stride == 0) ^ (y % stride == 0))
}

/// A stride-3 lattice with a solid `(2r + 1)`-square block at the centre.
///
/// The classic interactive start state: the lattice keeps the whole field
/// busy while the centre block collapses into long-lived debris. The
/// lattice leaves the last two columns and rows clear; the block is
/// clipped at the edges if `r` is large.
pub fn lattice_with_block(width: u32, height: u32, r: u32) -> Result<Grid, GridError> {
    let grid = generate(width, height, |x, y| {
        x + 2 < width && y + 2 < height && ((x % 3 == 0) ^ (y % 3 == 0))
    })?;
    let cx = i64::from(width / 2);
    let cy = i64::from(height / 2);
    let r = i64::from(r);
    for x in cx - r..=cx + r {
        for y in cy - r..=cy + r {
            if x >= 0 && x < i64::from(width) && y >= 0 && y < i64::from(height) {
                grid.set_alive(x as u32, y as u32, true);
            }
        }
    }
    Ok(grid)
}

/// Load a pattern from line-oriented text: every non-space character
/// marks a live cell, line index is `y`, character index is `x`.
///
/// A pattern taller or wider than the grid is silently clipped; the grid
/// is not resized to fit.
pub fn from_pattern<I, S>(width: u32, height: u32, lines: I) -> Result<Grid, GridError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let grid = Grid::new(width, height)?;
    for (y, line) in lines.into_iter().enumerate() {
        if y >= height as usize {
            break;
        }
        for (x, c) in line.as_ref().chars().enumerate() {
            if x >= width as usize {
                break;
            }
            if c != ' ' {
                grid.set_alive(x as u32, y as u32, true);
            }
        }
    }
    Ok(grid)
}
