//! Petri: a parallel Game-of-Life tick engine.
//!
//! A fixed pool of worker threads advances a 2D cellular automaton as
//! fast as it can; a consumer drains completed generations through a
//! bounded queue at its own pace, and retired buffers cycle back
//! through a pool instead of being reallocated every tick.
//!
//! This is the top-level facade crate re-exporting the public API from
//! the Petri sub-crates. For most users, adding `petri` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use petri::prelude::*;
//! use std::sync::Arc;
//!
//! // A 32x32 universe seeded with a blinker, advanced for 4
//! // generations by 2 workers under the canonical Conway rule.
//! let initial = petri::grid::factory::from_pattern(32, 32, ["", " #", " #", " #"]).unwrap();
//! let canvas = Arc::new(FixedCanvas::new(32, 32).unwrap());
//! let config = EngineConfig {
//!     worker_count: Some(2),
//!     max_generation: Some(4),
//!     ..Default::default()
//! };
//! let (engine, frames) = LifeEngine::spawn(config, canvas, initial).unwrap();
//!
//! let mut populations = Vec::new();
//! while let Some(frame) = frames.recv() {
//!     populations.push((frame.tick(), frame.population()));
//! } // dropping each frame recycles its buffer
//!
//! engine.join().unwrap();
//! assert_eq!(populations.len(), 5); // generations 0..=4
//! assert!(populations.iter().all(|&(_, p)| p == 3)); // a blinker stays 3 cells
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grid data model: buffers, rules, factories, partitioning (`petri-grid`).
pub use petri_grid as grid;

/// The parallel tick engine: workers, coordinator, pool, handoff
/// (`petri-engine`).
pub use petri_engine as engine;

/// Common imports for typical Petri usage.
///
/// ```rust
/// use petri::prelude::*;
/// ```
pub mod prelude {
    pub use petri_engine::{
        CanvasSource, ConfigError, EngineConfig, EngineError, EngineMetrics, FixedCanvas, Frame,
        Frames, GridPool, LifeEngine, RenderSink, SharedCanvas,
    };
    pub use petri_grid::{Grid, GridError, Partition, RuleTable};
}
