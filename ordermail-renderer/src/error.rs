//! Error types for ordermail-renderer.

use std::path::PathBuf;

use ordermail_core::DataError;
use thiserror::Error;

/// All errors that can arise from rendering an email.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Input data was rejected before any markup was produced.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// JSON serialization error (building tera context).
    #[error("context serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while loading override templates.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}
