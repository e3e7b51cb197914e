//! Session normalization.
//!
//! History arrives from the storage layer as loosely-typed JSON. Each entry is
//! converted into a `SessionRecord` on its own; entries that cannot be
//! converted are skipped with a warning so one corrupt record never hides the
//! rest of the history.

use crate::{Error, ExerciseLog, Result, SessionKind, SessionRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Session entry as written by the storage layer
#[derive(Debug, Deserialize)]
pub struct RawSession {
    #[serde(alias = "timestamp", alias = "performed_at")]
    pub date: Option<String>,
    #[serde(alias = "type")]
    pub kind: Option<String>,
    #[serde(default, alias = "isDeload")]
    pub is_deload: Option<bool>,
    #[serde(default)]
    pub exercises: Option<BTreeMap<String, ExerciseLog>>,
}

impl TryFrom<RawSession> for SessionRecord {
    type Error = Error;

    fn try_from(raw: RawSession) -> Result<Self> {
        let date = raw
            .date
            .ok_or_else(|| Error::InvalidRecord("missing date".into()))?;
        let performed_at = parse_timestamp(&date)?;

        let kind_tag = raw
            .kind
            .ok_or_else(|| Error::InvalidRecord("missing kind".into()))?;
        let kind = SessionKind::parse(&kind_tag)
            .ok_or_else(|| Error::InvalidRecord(format!("unknown kind {:?}", kind_tag)))?;

        Ok(SessionRecord {
            performed_at,
            kind,
            is_deload: raw.is_deload.unwrap_or(false),
            exercises: raw.exercises.unwrap_or_default(),
        })
    }
}

/// Parse a timestamp into local wall-clock time
///
/// RFC 3339 values keep the wall time as written; the offset is dropped.
/// Bare dates map to midnight.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::InvalidRecord(format!("unparseable date {:?}", s)))
}

/// Normalize a single JSON entry
pub fn normalize_entry(value: &Value) -> Result<SessionRecord> {
    let raw: RawSession = serde_json::from_value(value.clone())?;
    SessionRecord::try_from(raw)
}

/// Normalize a slice of JSON entries, skipping malformed ones
pub fn normalize_sessions(entries: &[Value]) -> Vec<SessionRecord> {
    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match normalize_entry(entry) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Skipping session at index {}: {}", index, e);
            }
        }
    }

    if records.len() < entries.len() {
        tracing::debug!(
            "Normalized {} of {} sessions",
            records.len(),
            entries.len()
        );
    }
    records
}

/// Normalize a whole JSON document; anything other than an array is empty
pub fn normalize_value(value: &Value) -> Vec<SessionRecord> {
    match value {
        Value::Array(entries) => normalize_sessions(entries),
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(
                "Session history is not a list (found {}), treating as empty",
                json_type_name(other)
            );
            Vec::new()
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
