//! Session history loading.
//!
//! History is read either from the session journal (JSON Lines) or from a
//! JSON array exported by another client. Entries that fail to normalize are
//! skipped with a warning.

use crate::normalize::{normalize_entry, normalize_value};
use crate::{Result, SessionRecord};
use fs2::FileExt;
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Load all sessions from a history file
///
/// Returns an empty history if the file doesn't exist.
pub fn load_history(path: &Path) -> Result<Vec<SessionRecord>> {
    if !path.exists() {
        tracing::debug!("No history file at {:?}", path);
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    let sessions = if contents.trim_start().starts_with('[') {
        let value: Value = serde_json::from_str(&contents)?;
        normalize_value(&value)
    } else {
        parse_lines(&contents)
    };

    tracing::debug!("Loaded {} sessions from {:?}", sessions.len(), path);
    Ok(sessions)
}

fn parse_lines(contents: &str) -> Vec<SessionRecord> {
    let mut sessions = Vec::new();

    for (line_num, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let parsed = serde_json::from_str::<Value>(line)
            .map_err(crate::Error::from)
            .and_then(|value| normalize_entry(&value));

        match parsed {
            Ok(session) => sessions.push(session),
            Err(e) => {
                tracing::warn!("Failed to parse session at line {}: {}", line_num + 1, e);
            }
        }
    }

    sessions
}
