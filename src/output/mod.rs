//! Output module for storing documents and reporting runs
//!
//! This module handles:
//! - The `DocumentSink` interface the coordinator saves through
//! - Text file and SQLite sink implementations
//! - Console and markdown summaries of a run

mod markdown;
mod sqlite_sink;
pub mod stats;
mod text_sink;
mod traits;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use sqlite_sink::{SqliteSink, StoredDocument};
pub use stats::print_summary;
pub use text_sink::TextFileSink;
pub use traits::{DocumentSink, OutputError, OutputResult};

use crate::config::{OutputConfig, OutputFormat};
use std::path::Path;

/// Opens the sink selected by the output configuration
///
/// # Returns
///
/// * `Ok(Box<dyn DocumentSink>)` - Ready to save documents
/// * `Err(OutputError)` - The database could not be opened
pub fn open_sink(config: &OutputConfig) -> OutputResult<Box<dyn DocumentSink>> {
    match config.format {
        OutputFormat::Text => Ok(Box::new(TextFileSink::new(&config.directory))),
        OutputFormat::Sqlite => {
            let path = config.database_path.as_deref().ok_or_else(|| {
                OutputError::Write("database_path is required for sqlite output".to_string())
            })?;
            Ok(Box::new(SqliteSink::new(Path::new(path))?))
        }
    }
}
