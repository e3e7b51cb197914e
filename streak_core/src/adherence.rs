//! Adherence engine.
//!
//! Adherence is the share of eligible days in a trailing window that have at
//! least one recorded session. The window never reaches back before the first
//! session, nor before the start of Week 1 when a Week Zero is active. Today is
//! only eligible once something has been logged for it.

use crate::calendar::{collect_days, days_between};
use crate::{ActivePlan, AdherenceResult, Error, Result, SessionRecord, WeekZeroInfo};
use chrono::{Days, NaiveDateTime};

/// Default trailing window, in days
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Compute adherence; internal failures degrade to 0
pub fn compute_adherence(
    sessions: &[SessionRecord],
    active_plan: Option<&ActivePlan>,
    window_days: u32,
    week_zero: Option<&WeekZeroInfo>,
    now: NaiveDateTime,
) -> AdherenceResult {
    if let Some(plan) = active_plan {
        tracing::debug!("Adherence ignores active plan {:?} for now", plan.name);
    }

    match try_compute_adherence(sessions, window_days, week_zero, now) {
        Ok(percent) => percent,
        Err(e) => {
            tracing::error!("Adherence computation failed, reporting zero: {}", e);
            0
        }
    }
}

fn try_compute_adherence(
    sessions: &[SessionRecord],
    window_days: u32,
    week_zero: Option<&WeekZeroInfo>,
    now: NaiveDateTime,
) -> Result<AdherenceResult> {
    let today = now.date();
    let days = collect_days(sessions, today);
    let Some(first_day) = days.keys().next().copied() else {
        return Ok(0);
    };

    let since_first = days_between(first_day, today) + 1;
    let effective = i64::from(window_days).min(since_first);
    if effective <= 0 {
        return Ok(0);
    }

    let mut start = today
        .checked_sub_days(Days::new((effective - 1) as u64))
        .ok_or_else(|| Error::Calendar(format!("window of {} days before {}", effective, today)))?;

    if let Some((_, cycle_start)) = week_zero.and_then(WeekZeroInfo::span) {
        start = start.max(cycle_start);
    }

    let end = if days.contains_key(&today) {
        today
    } else {
        today
            .pred_opt()
            .ok_or_else(|| Error::Calendar(format!("no day before {}", today)))?
    };

    if end < start {
        return Ok(0);
    }

    let eligible = days_between(start, end) + 1;
    let logged = days.range(start..=end).count() as i64;
    let percent = (100.0 * logged as f64 / eligible as f64).round().clamp(0.0, 100.0) as u8;

    tracing::debug!(
        "Adherence {}..={}: {}/{} days = {}%",
        start,
        end,
        logged,
        eligible,
        percent
    );

    Ok(percent)
}
