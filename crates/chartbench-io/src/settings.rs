use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use chartbench_core::RenderMode;
use chartbench_layout::SplitConfig;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Workbench configuration, read from a JSON file.
///
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchSettings {
    pub layout: SplitConfig,
    pub default_mode: RenderMode,
    /// Base URL share links are built from.
    pub share_base_url: Option<String>,
    /// Container size used when no real window is available.
    pub container: ContainerSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ContainerSize {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 900.0,
        }
    }
}

impl WorkbenchSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
