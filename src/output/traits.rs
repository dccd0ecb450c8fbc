//! Output sink trait and error types
//!
//! A sink durably stores extracted text under a document identifier. The
//! coordinator treats every sink error as a per-document warning; a failed
//! save never stops a run.

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for extracted documents
pub trait DocumentSink: Send {
    /// Stores `body` under `identifier`, replacing any previous version
    ///
    /// # Arguments
    ///
    /// * `identifier` - Filesystem-safe document identifier
    /// * `body` - The extracted text
    fn save(&self, identifier: &str, body: &str) -> OutputResult<()>;

    /// Describes where documents go, for log messages
    fn location(&self) -> String;
}
