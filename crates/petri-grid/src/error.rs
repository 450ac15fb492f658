//! Error types for grid construction.

use std::fmt;

/// Errors arising from grid or rule-table construction.
///
/// All variants are configuration errors in the sense of the engine's
/// error taxonomy: they are rejected before any simulation state exists,
/// never mid-tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Attempted to construct a grid with a zero dimension.
    EmptyGrid,
    /// A dimension exceeds the coordinate range.
    DimensionTooLarge {
        /// Which axis overflowed (`"width"` or `"height"`).
        name: &'static str,
        /// The offending value.
        value: u32,
        /// The maximum supported value.
        max: u32,
    },
    /// A factory stride parameter was zero (`y % 0` is undefined).
    ZeroStride,
    /// A rule table referenced a neighbour count outside `[0, 8]`.
    InvalidNeighbourCount {
        /// The offending count.
        count: u8,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "{name} {value} exceeds maximum dimension {max}")
            }
            Self::ZeroStride => write!(f, "stride must be at least 1"),
            Self::InvalidNeighbourCount { count } => {
                write!(f, "neighbour count {count} outside [0, 8]")
            }
        }
    }
}

impl std::error::Error for GridError {}
