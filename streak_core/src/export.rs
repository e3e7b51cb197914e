//! CSV export of the weekly breakdown.
//!
//! Writes one row per calendar week, newest first, for spreadsheet-style
//! stats consumers. The file is replaced atomically.

use crate::streak::WeekSummary;
use crate::{Error, Result};
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    week_start: String,
    status: &'static str,
    outcome: &'static str,
    contributed_days: Option<u32>,
    logged_days: u32,
    strength_sessions: u32,
    sick_days: u32,
    neutral_days: u32,
    first_deload: Option<String>,
}

impl From<&WeekSummary> for CsvRow {
    fn from(week: &WeekSummary) -> Self {
        CsvRow {
            week_start: week.week_start.to_string(),
            status: week.status.as_str(),
            outcome: week.outcome.label(),
            contributed_days: week.outcome.days(),
            logged_days: week.logged_days,
            strength_sessions: week.strength_sessions,
            sick_days: week.sick_days,
            neutral_days: week.neutral_days,
            first_deload: week.first_deload.map(|d| d.to_string()),
        }
    }
}

/// Write weekly summaries to a CSV file, returning the row count
pub fn write_week_csv(weeks: &[WeekSummary], path: &Path) -> Result<usize> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(temp.as_file());

        for week in weeks {
            writer.serialize(CsvRow::from(week))?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Exported {} weeks to {:?}", weeks.len(), path);
    Ok(weeks.len())
}
