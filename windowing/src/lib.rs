//! A headless viewport windowing engine.
//!
//! Renders an unbounded collection of variable-height items through a bounded number of live
//! nodes: per-item heights with a lazily cached prefix sum, visible-range search under dynamic
//! heights, overscan, a fixed-cell grid variant, and a frame-rate driven policy deciding when
//! windowing should switch on at all.
//!
//! It is UI-agnostic. A host rendering layer is expected to provide:
//! - the items and the viewport (scroll position, visible size)
//! - measured item heights once items are rendered
//! - frame and scroll timestamps (`now_ms`)
//!
//! For session-level orchestration (auto activation, scroll anchoring), see the
//! `windowing-adapter` crate.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod engine;
mod error;
mod fenwick;
mod grid;
mod heights;
mod options;
mod policy;
pub mod range;
mod scroll;
mod types;


pub use engine::WindowEngine;
pub use error::WindowError;
pub use fenwick::FenwickHeights;
pub use grid::GridWindowEngine;
pub use heights::{HeightIndex, HeightStore};
pub use options::{GridOptions, WindowOptions};
pub use policy::{PerformancePolicy, PerformanceSnapshot};
pub use scroll::{ScrollState, ScrollTracker};
pub use types::{
    GridItem, GridWindow, RowRange, ScrollDirection, Viewport, VisibleRange, Window, WindowItem,
};
