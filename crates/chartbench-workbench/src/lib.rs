//! # Chartbench Workbench
//!
//! Top-level owner of the canonical specification and its metrics. Wires
//! editor runs into the render controller, layout geometry changes into
//! surface resizes, and the ready engine instance into export actions.

pub mod coordinator;
pub mod observer;

pub use coordinator::Workbench;
pub use observer::{LogObserver, WorkbenchObserver};
