//! Plain text file sink
//!
//! Each document becomes `<directory>/<identifier>.txt`, UTF-8 encoded.

use crate::output::traits::{DocumentSink, OutputError, OutputResult};
use crate::url::is_safe_identifier;
use std::fs;
use std::path::PathBuf;

/// Writes one text file per document
#[derive(Debug, Clone)]
pub struct TextFileSink {
    directory: PathBuf,
}

impl TextFileSink {
    /// Creates a sink writing into `directory`
    ///
    /// The directory is created on the first save, not here, so a run that
    /// saves nothing leaves no trace.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Path a document with this identifier is written to
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.directory.join(format!("{}.txt", identifier))
    }
}

impl DocumentSink for TextFileSink {
    fn save(&self, identifier: &str, body: &str) -> OutputResult<()> {
        if !is_safe_identifier(identifier) {
            return Err(OutputError::Write(format!(
                "refusing to write unsafe identifier '{}'",
                identifier
            )));
        }

        fs::create_dir_all(&self.directory)?;
        let path = self.path_for(identifier);
        fs::write(&path, body)?;

        tracing::info!("Saved {} ({} chars)", path.display(), body.chars().count());
        Ok(())
    }

    fn location(&self) -> String {
        format!("directory {}", self.directory.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let sink = TextFileSink::new(temp.path().join("works"));

        sink.save("hamlet", "To be, or not to be").unwrap();

        let written = fs::read_to_string(temp.path().join("works").join("hamlet.txt")).unwrap();
        assert_eq!(written, "To be, or not to be");
    }

    #[test]
    fn test_save_overwrites() {
        let temp = TempDir::new().unwrap();
        let sink = TextFileSink::new(temp.path());

        sink.save("macbeth", "first").unwrap();
        sink.save("macbeth", "second").unwrap();

        assert_eq!(fs::read_to_string(sink.path_for("macbeth")).unwrap(), "second");
    }

    #[test]
    fn test_unsafe_identifier_rejected() {
        let temp = TempDir::new().unwrap();
        let sink = TextFileSink::new(temp.path());

        let result = sink.save("../escape", "text");
        assert!(matches!(result, Err(OutputError::Write(_))));
    }

    #[test]
    fn test_unwritable_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let sink = TextFileSink::new(blocker.join("works"));
        assert!(sink.save("hamlet", "text").is_err());
    }
}
