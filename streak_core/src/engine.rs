//! Evaluation boundary.
//!
//! Samples the clock once, normalizes raw history and runs both engines with
//! the same `now`. Nothing here returns an error: bad records are skipped and
//! internal failures degrade to zero inside each engine.

use crate::adherence::compute_adherence;
use crate::normalize::normalize_value;
use crate::streak::compute_streak_with;
use crate::{ActivePlan, AdherenceResult, ClockSource, Config, SessionRecord, WeekZeroInfo};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

/// Combined engine output for UI screens and the stats aggregator
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ProgressReport {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub adherence: AdherenceResult,
    pub window_days: u32,
    pub sessions_considered: usize,
    pub evaluated_at: NaiveDateTime,
}

/// Evaluate raw JSON history against a clock
pub fn evaluate(
    history: &Value,
    clock: &dyn ClockSource,
    week_zero: Option<&WeekZeroInfo>,
    plan: Option<&ActivePlan>,
    config: &Config,
) -> ProgressReport {
    let now = clock.now();
    let records = normalize_value(history);
    evaluate_records(&records, now, week_zero, plan, config)
}

/// Evaluate already-normalized records at a fixed instant
pub fn evaluate_records(
    records: &[SessionRecord],
    now: NaiveDateTime,
    week_zero: Option<&WeekZeroInfo>,
    plan: Option<&ActivePlan>,
    config: &Config,
) -> ProgressReport {
    let streak = compute_streak_with(records, now, week_zero, &config.streak);
    let window_days = config.adherence.window_days;
    let adherence = compute_adherence(records, plan, window_days, week_zero, now);

    tracing::info!(
        "Evaluated {} sessions at {}: current={} longest={} adherence={}%",
        records.len(),
        now,
        streak.current_streak,
        streak.longest_streak,
        adherence
    );

    ProgressReport {
        current_streak: streak.current_streak,
        longest_streak: streak.longest_streak,
        adherence,
        window_days,
        sessions_considered: records.len(),
        evaluated_at: now,
    }
}
