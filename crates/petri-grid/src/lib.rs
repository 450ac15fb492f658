//! Grid data model for the Petri cellular-automaton engine.
//!
//! This crate holds everything about a generation that does not involve
//! threads: the [`Grid`] buffer itself, the [`RuleTable`] governing cell
//! transitions, the [`factory`] functions that populate an initial grid,
//! and the [`Partition`] arithmetic that splits a grid's columns across a
//! fixed worker pool.
//!
//! # Universe semantics
//!
//! The universe is closed and non-toroidal: coordinates outside
//! `[0, width) x [0, height)` read as dead, so edge cells simply have
//! fewer live-able neighbours. There is no wraparound.
//!
//! # Index mapping
//!
//! Cell storage is **column-major**: `index = x * height + y`. Workers are
//! assigned contiguous column ranges, so each worker's writes land in one
//! contiguous span of the backing vector.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod factory;
pub mod grid;
pub mod partition;
pub mod rule;

pub use error::GridError;
pub use grid::Grid;
pub use partition::Partition;
pub use rule::RuleTable;
