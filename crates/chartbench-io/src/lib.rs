//! # Chartbench I/O
//!
//! The action dispatcher (spec and raster export, share link) plus the
//! file-backed collaborators the workbench is wired with: download sinks,
//! clipboard and location seams, the JSON key/value store, and settings.
//!
//! Actions borrow the specification and engine instance for one call and
//! never keep them.

pub mod actions;
pub mod clipboard;
pub mod settings;
pub mod sink;
pub mod slug;
pub mod store;

pub use actions::{ActionDispatcher, Artifact, ArtifactKind, ExportError};
pub use clipboard::{Clipboard, Location, MemoryClipboard, StaticLocation};
pub use settings::{ContainerSize, SettingsError, WorkbenchSettings};
pub use sink::{DirectorySink, Download, DownloadSink, MemorySink};
pub use slug::slugify;
pub use store::JsonFileStore;
