//! SQLite document sink
//!
//! Stores documents in a single `documents` table keyed by identifier, with a
//! content digest and save timestamp for downstream indexers.

use crate::output::traits::{DocumentSink, OutputResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// SQL schema for the document store
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    identifier TEXT PRIMARY KEY,
    body TEXT NOT NULL,
    length INTEGER NOT NULL,
    sha256 TEXT NOT NULL,
    saved_at TEXT NOT NULL
);
"#;

/// A stored document row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub identifier: String,
    pub body: String,
    pub length: i64,
    pub sha256: String,
    pub saved_at: String,
}

/// Writes documents into a SQLite database
pub struct SqliteSink {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteSink {
    /// Opens (or creates) the database at `path`
    pub fn new(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn, path: None })
    }

    /// Loads a document by identifier
    pub fn load(&self, identifier: &str) -> OutputResult<Option<StoredDocument>> {
        let document = self
            .conn
            .query_row(
                "SELECT identifier, body, length, sha256, saved_at FROM documents WHERE identifier = ?1",
                params![identifier],
                |row| {
                    Ok(StoredDocument {
                        identifier: row.get(0)?,
                        body: row.get(1)?,
                        length: row.get(2)?,
                        sha256: row.get(3)?,
                        saved_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(document)
    }

    /// Number of stored documents
    pub fn count(&self) -> OutputResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl DocumentSink for SqliteSink {
    fn save(&self, identifier: &str, body: &str) -> OutputResult<()> {
        let length = body.chars().count() as i64;
        let digest = hex::encode(Sha256::digest(body.as_bytes()));
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO documents (identifier, body, length, sha256, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(identifier) DO UPDATE SET
                body = excluded.body,
                length = excluded.length,
                sha256 = excluded.sha256,
                saved_at = excluded.saved_at",
            params![identifier, body, length, digest, now],
        )?;

        tracing::info!("Stored {} ({} chars)", identifier, length);
        Ok(())
    }

    fn location(&self) -> String {
        match &self.path {
            Some(path) => format!("database {}", path.display()),
            None => "in-memory database".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let sink = SqliteSink::new_in_memory().unwrap();
        sink.save("hamlet", "To be, or not to be").unwrap();

        let doc = sink.load("hamlet").unwrap().unwrap();
        assert_eq!(doc.body, "To be, or not to be");
        assert_eq!(doc.length, 19);
        assert_eq!(doc.sha256.len(), 64);
        assert!(sink.load("macbeth").unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_existing() {
        let sink = SqliteSink::new_in_memory().unwrap();
        sink.save("lear", "first").unwrap();
        sink.save("lear", "second version").unwrap();

        assert_eq!(sink.count().unwrap(), 1);
        let doc = sink.load("lear").unwrap().unwrap();
        assert_eq!(doc.body, "second version");
        assert_eq!(doc.length, 14);
    }

    #[test]
    fn test_on_disk_database() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("works.db");

        {
            let sink = SqliteSink::new(&path).unwrap();
            sink.save("tempest", "Full fathom five").unwrap();
        }

        let reopened = SqliteSink::new(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
        assert!(reopened.location().contains("works.db"));
    }
}
