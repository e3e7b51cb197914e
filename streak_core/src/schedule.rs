//! Schedule state persistence with file locking.
//!
//! Holds the Week Zero decision made when the first-ever session is logged,
//! so later evaluations reuse it instead of recomputing it. A manual cycle
//! reset clears it.

use crate::week_zero::resolve_week_zero;
use crate::{Error, Result, WeekZeroInfo};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persisted schedule-tracking state
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScheduleState {
    #[serde(default)]
    pub week_zero: Option<WeekZeroInfo>,
    /// Week Zero has been decided (or reset) and must not be recomputed
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub cycle_reset_on: Option<NaiveDate>,
}

impl ScheduleState {
    /// Week Zero info to hand to the engines, if active
    pub fn active_week_zero(&self) -> Option<&WeekZeroInfo> {
        self.week_zero.as_ref().filter(|info| info.is_week_zero)
    }

    /// Decide Week Zero from the first-ever session day
    ///
    /// Returns true if the state changed.
    pub fn record_first_session(&mut self, first_day: NaiveDate) -> bool {
        if self.resolved {
            return false;
        }
        self.week_zero = resolve_week_zero(first_day);
        self.resolved = true;
        true
    }

    /// Clear Week Zero on a manual cycle reset
    pub fn reset_cycle(&mut self, today: NaiveDate) {
        tracing::info!("Cycle reset on {}, clearing Week Zero", today);
        self.week_zero = None;
        self.resolved = true;
        self.cycle_reset_on = Some(today);
    }

    /// Load schedule state from a file with shared locking
    ///
    /// Returns default state if file doesn't exist.
    /// If file is corrupted, logs a warning and returns default state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No schedule file found, using default state");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open schedule file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock schedule file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read schedule file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<ScheduleState>(&contents) {
            Ok(state) => {
                tracing::debug!("Loaded schedule state from {:?}", path);
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse schedule file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save schedule state atomically (temp file, sync, rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Other(format!("schedule path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved schedule state to {:?}", path);
        Ok(())
    }

    /// Sidecar lock file guarding read-modify-write cycles
    ///
    /// The state file itself is replaced on every save, so it cannot carry
    /// the lock.
    pub fn lock_path(path: &Path) -> PathBuf {
        path.with_extension("lock")
    }

    /// Load state, modify it, and save it back under an exclusive lock
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut ScheduleState) -> Result<()>,
    {
        let lock_path = Self::lock_path(path);
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        lock.lock_exclusive()?;

        let mut state = Self::load(path)?;
        f(&mut state)?;
        state.save(path)?;

        lock.unlock()?;
        Ok(state)
    }
}
