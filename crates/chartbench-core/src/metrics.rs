use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

/// Derived figures for the most recent successful apply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub generated_at: SystemTime,
    pub apply_duration_ms: f64,
}

impl Metrics {
    pub fn new(generated_at: SystemTime, apply_duration: Duration) -> Self {
        Self {
            generated_at,
            apply_duration_ms: apply_duration.as_secs_f64() * 1000.0,
        }
    }

    /// Metrics stamped before any apply has been measured.
    pub fn pending(generated_at: SystemTime) -> Self {
        Self {
            generated_at,
            apply_duration_ms: 0.0,
        }
    }
}
