//! Barrier-synchronized parallel tick engine for the Petri cellular
//! automaton.
//!
//! A fixed pool of worker threads advances the grid generation by
//! generation as fast as it can, while a consumer drains completed
//! generations at its own pace through a bounded queue.
//!
//! # Architecture
//!
//! ```text
//! Workers (N)                 Coordinator (barrier action)      Consumer
//!     |                               |                            |
//!     |-- barrier.wait() ------------>| runs on last arriver:      |
//!     |   (parked)                    |  pool.acquire or alloc     |
//!     |                               |  swap current grid ref     |
//!     |                               |  enqueue completed  ------>| Frames::recv()
//!     |                               |  (blocks when full)        | render
//!     |<-- released ------------------|  generation cap check      | drop Frame
//!     | snapshot dest, compute        |                            |   └─> pool.recycle
//!     | partition x height            |                            |
//!     | source = dest, loop           |                            |
//! ```
//!
//! Per tick, every worker writes a disjoint column partition of a shared
//! destination grid while reading a frozen source grid; the coordinator
//! action runs exactly once, between the last arrival and the first
//! release. Buffers cycle engine → consumer → pool → engine, so a
//! stable-size run stops allocating after its first two buffers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod barrier;
pub mod canvas;
pub mod config;
pub mod engine;
pub mod error;
pub mod handoff;
pub mod metrics;
pub mod pool;
mod worker;

pub use canvas::{CanvasSource, FixedCanvas, SharedCanvas};
pub use config::{ConfigError, EngineConfig};
pub use engine::LifeEngine;
pub use error::EngineError;
pub use handoff::{Frame, Frames, RenderSink};
pub use metrics::EngineMetrics;
pub use pool::GridPool;
