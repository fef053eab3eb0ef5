//! # Chartbench Render
//!
//! Owns the one live engine instance bound to the preview surface. Decides
//! whether an apply can update the instance in place or must dispose and
//! rebuild it, measures each apply, and forwards resizes.
//!
//! The concrete engine sits behind [`RenderBackend`] / [`EngineInstance`];
//! [`HeadlessBackend`] is a software stand-in for tools and tests.

pub mod engine;
pub mod error;
pub mod headless;
pub mod lifecycle;
pub mod snapshot;
pub mod surface;

pub use engine::{EngineHandle, EngineInstance, LiveInstance, RenderBackend};
pub use error::EngineError;
pub use headless::{HeadlessBackend, HeadlessInstance};
pub use lifecycle::{ApplyReport, RenderController};
pub use snapshot::{RasterImage, SnapshotOptions};
pub use surface::{SurfaceBox, SurfaceId};
