//! # Chartbench Core
//!
//! Shared data model for the live preview workbench: the opaque chart
//! specification, render mode toggles and the reuse-vs-recreate decision,
//! apply metrics, and the key/value store the layout preference lives in.
//!
//! Nothing in this crate touches a rendering backend or a pointer device.

pub mod clock;
pub mod error;
pub mod metrics;
pub mod mode;
pub mod spec;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::CoreError;
pub use metrics::Metrics;
pub use mode::{plan_transition, Backend, EngineMode, ModeTransition, RenderMode, Theme};
pub use spec::Specification;
pub use storage::{KeyValueStore, MemoryStore};
