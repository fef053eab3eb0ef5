//! # Chartbench Layout
//!
//! The split-pane layout manager. Turns pointer drags into a clamped left
//! panel width, persists it through an injected key/value store, and
//! reports when the render surface needs to be resized.
//!
//! It has no knowledge of rendering.

pub mod geometry;
pub mod pointer;
pub mod split;

pub use geometry::ContainerRect;
pub use pointer::{ListenerId, ListenerRegistry, PointerCapture};
pub use split::{clamp_offset, LayoutManager, LayoutSignal, LayoutState, SplitConfig};

/// Smallest width either panel may be dragged to, in pixels.
pub const MIN_PANEL_WIDTH: f64 = 300.0;

/// Storage key the split offset is persisted under.
pub const SPLIT_STORAGE_KEY: &str = "chartbench.split_offset_px";
