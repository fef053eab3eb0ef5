use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use chartbench_core::Specification;
use chartbench_render::{EngineError, EngineInstance, SnapshotOptions};

use crate::clipboard::{Clipboard, Location};
use crate::sink::DownloadSink;
use crate::slug::slugify;

/// File stem used when a title slugifies to nothing.
const FALLBACK_STEM: &str = "chart";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// The specification, pretty-printed JSON.
    Spec,
    /// A snapshot image of the live instance.
    Raster,
}

/// What an export delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub mime_type: String,
    pub size: usize,
}

/// Stateless export and share operations.
///
/// Raster snapshots are always taken at 2x density on white. The
/// specification and instance are borrowed per call.
#[derive(Debug, Clone, Default)]
pub struct ActionDispatcher {
    snapshot: SnapshotOptions,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot_options(&self) -> &SnapshotOptions {
        &self.snapshot
    }

    /// Export `kind` as a download named after `title`.
    ///
    /// A raster export with no live instance does nothing and returns
    /// `Ok(None)`.
    pub fn export_artifact<I: EngineInstance + ?Sized>(
        &self,
        kind: ArtifactKind,
        spec: &Specification,
        instance: Option<&I>,
        title: &str,
        sink: &mut dyn DownloadSink,
    ) -> Result<Option<Artifact>, ExportError> {
        let (bytes, mime_type, extension) = match kind {
            ArtifactKind::Spec => {
                let json = spec.to_pretty_json()?;
                (json.into_bytes(), "application/json".to_string(), "json".to_string())
            }
            ArtifactKind::Raster => {
                let Some(instance) = instance else {
                    log::debug!("Raster export skipped: no live engine instance");
                    return Ok(None);
                };
                let image = instance.snapshot(&self.snapshot)?;
                (image.bytes, image.mime_type, image.extension)
            }
        };

        let file_name = artifact_file_name(title, &extension);
        sink.deliver(&file_name, &mime_type, &bytes)?;
        Ok(Some(Artifact {
            kind,
            file_name,
            mime_type,
            size: bytes.len(),
        }))
    }

    /// Copy the current location to the clipboard. Returns the URL copied.
    pub fn share_link(
        &self,
        location: &dyn Location,
        clipboard: &mut dyn Clipboard,
    ) -> Result<String, ExportError> {
        let url = location.current_url();
        clipboard.write_text(&url)?;
        log::info!("Copied share link {}", url);
        Ok(url)
    }
}

fn artifact_file_name(title: &str, extension: &str) -> String {
    let slug = slugify(title);
    let stem = if slug.is_empty() { FALLBACK_STEM } else { slug.as_str() };
    format!("{}.{}", stem, extension)
}
