//! Adapter utilities for the `windowing` crate.
//!
//! The `windowing` crate is UI-agnostic and focuses on the core math and state. This crate
//! provides small, framework-neutral helpers a rendering surface typically needs:
//!
//! - [`AutoWindow`]: one surface's engine, scroll tracker and performance policy, switching
//!   windowing on when the collection is large or frames get slow
//! - Scroll anchoring (keep the viewport on an item across a collection swap)
//!
//! This crate is intentionally framework-agnostic.
#![forbid(unsafe_code)]

#[cfg(feature = "tracing")]
macro_rules! adebug {
    ($($tt:tt)*) => {
        tracing::debug!(target: "windowing_adapter", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! adebug {
    ($($tt:tt)*) => {};
}

mod anchor;
mod auto;

#[cfg(test)]
mod tests;

pub use anchor::{ScrollAnchor, apply_anchor, capture_first_visible_anchor};
pub use auto::{AutoFrame, AutoWindow, WindowStatus};
