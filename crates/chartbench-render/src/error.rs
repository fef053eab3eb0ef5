use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to create engine instance: {0}")]
    Instantiate(String),

    #[error("Engine rejected specification: {0}")]
    Specification(String),

    #[error("Snapshot failed: {0}")]
    Snapshot(String),

    #[error("Engine instance has been disposed")]
    Disposed,
}
