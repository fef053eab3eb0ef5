use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::actions::ExportError;

/// Destination for client-side downloads.
pub trait DownloadSink {
    fn deliver(
        &mut self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<(), ExportError>;
}

/// Writes each download as a file in one directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(
        &mut self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(bytes)?;
        writer.flush()?;
        log::info!("Wrote {} ({}, {} bytes)", path.display(), mime_type, bytes.len());
        Ok(())
    }
}

/// One captured download.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Keeps downloads in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub downloads: Vec<Download>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Download> {
        self.downloads.last()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(
        &mut self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<(), ExportError> {
        self.downloads.push(Download {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }
}
