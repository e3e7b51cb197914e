//! Session journal.
//!
//! Sessions are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access. Each line uses the same shape the
//! normalizer reads back.

use crate::{Result, SessionRecord};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Session sink trait for persisting sessions
pub trait SessionSink {
    fn append(&mut self, session: &SessionRecord) -> Result<()>;
}

/// JSONL-based session sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl SessionSink for JsonlSink {
    fn append(&mut self, session: &SessionRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(session)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!(
            "Appended {} session at {} to journal",
            session.kind.as_str(),
            session.performed_at
        );
        Ok(())
    }
}
