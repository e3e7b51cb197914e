//! Streak engine.
//!
//! Walks calendar weeks newest→oldest and scores each one as an explicit
//! outcome:
//!
//! 1. **Deload weeks**: only logged days before the first deload day count,
//!    the strength minimum is waived and the run continues.
//! 2. **Partial weeks** (current, earliest, Week Zero): always valid, worth
//!    their logged-day count.
//! 3. **Complete weeks**: valid with at most `max_neutral_days` unlogged/rest
//!    days and enough strength sessions; worth 7 minus sick days.
//!
//! An invalid week ends the run. The run open at the first break is the
//! current streak (subject to the grace check on the last workout day); older
//! runs still feed the longest streak.

use crate::calendar::{
    collect_days, days_between, partition_weeks, CalendarWeek, DayLog, WeekStatus,
};
use crate::{Error, GracePolicy, Result, SessionRecord, StreakResult, StreakRules, WeekZeroInfo};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

/// Scored contribution of a single week
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", content = "days", rename_all = "snake_case")]
pub enum WeekOutcome {
    Valid(u32),
    /// Cut short by a deload day
    Truncated(u32),
    Invalid,
}

impl WeekOutcome {
    /// Days this week adds to the running total
    pub fn days(&self) -> Option<u32> {
        match self {
            WeekOutcome::Valid(days) | WeekOutcome::Truncated(days) => Some(*days),
            WeekOutcome::Invalid => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeekOutcome::Valid(_) => "valid",
            WeekOutcome::Truncated(_) => "truncated",
            WeekOutcome::Invalid => "invalid",
        }
    }
}

/// Per-week view for stats consumers
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WeekSummary {
    pub week_start: NaiveDate,
    pub status: WeekStatus,
    pub logged_days: u32,
    pub strength_sessions: u32,
    pub sick_days: u32,
    pub neutral_days: u32,
    pub first_deload: Option<NaiveDate>,
    pub outcome: WeekOutcome,
}

/// Score one week under the given rules
pub fn score_week(week: &CalendarWeek, rules: &StreakRules) -> WeekOutcome {
    if let Some(deload_day) = week.first_deload {
        return WeekOutcome::Truncated(week.logged_days_before(deload_day));
    }

    if week.status.is_partial() {
        return WeekOutcome::Valid(week.logged_days());
    }

    let sick_days = week.sick_days();
    let required = rules.required_strength(sick_days);

    if week.neutral_days() <= rules.max_neutral_days && week.strength_sessions >= required {
        WeekOutcome::Valid(7u32.saturating_sub(sick_days))
    } else {
        WeekOutcome::Invalid
    }
}

/// Compute streaks with default rules and no Week Zero
pub fn compute_streak(sessions: &[SessionRecord], now: NaiveDateTime) -> StreakResult {
    compute_streak_with(sessions, now, None, &StreakRules::default())
}

/// Compute streaks; internal failures degrade to `{0, 0}`
pub fn compute_streak_with(
    sessions: &[SessionRecord],
    now: NaiveDateTime,
    week_zero: Option<&WeekZeroInfo>,
    rules: &StreakRules,
) -> StreakResult {
    match try_compute_streak(sessions, now, week_zero, rules) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Streak computation failed, reporting zero: {}", e);
            StreakResult::default()
        }
    }
}

fn try_compute_streak(
    sessions: &[SessionRecord],
    now: NaiveDateTime,
    week_zero: Option<&WeekZeroInfo>,
    rules: &StreakRules,
) -> Result<StreakResult> {
    let today = now.date();
    let days = collect_days(sessions, today);
    if days.is_empty() {
        return Ok(StreakResult::default());
    }

    let weeks = partition_weeks(&days, today, week_zero)?;

    let mut running = 0u32;
    let mut longest = 0u32;
    let mut first_break: Option<u32> = None;

    for week in &weeks {
        let outcome = score_week(week, rules);
        match outcome.days() {
            Some(days) => {
                running += days;
                longest = longest.max(running);
            }
            None => {
                if first_break.is_none() {
                    first_break = Some(running);
                }
                running = 0;
            }
        }
        tracing::trace!("Week {} scored {:?}", week.start, outcome);
    }

    let open_run = first_break.unwrap_or(running);
    let current = if within_grace(&days, now, rules)? {
        open_run
    } else {
        0
    };

    tracing::debug!(
        "Streak over {} weeks: current={} longest={}",
        weeks.len(),
        current,
        longest
    );

    Ok(StreakResult {
        current_streak: current,
        longest_streak: longest,
    })
}

/// Whether the most recent workout day is close enough to `now`
///
/// Rest and sick entries do not keep a streak alive.
fn within_grace(
    days: &BTreeMap<NaiveDate, DayLog>,
    now: NaiveDateTime,
    rules: &StreakRules,
) -> Result<bool> {
    let Some((&last_day, last_log)) = days.iter().rev().find(|(_, log)| log.class.is_logged())
    else {
        return Ok(false);
    };

    match rules.grace {
        GracePolicy::CalendarDay => Ok(days_between(last_day, now.date()) <= 1),
        GracePolicy::Rolling => {
            let window = Duration::try_hours(rules.grace_hours).ok_or_else(|| {
                Error::Calendar(format!("grace window of {} hours", rules.grace_hours))
            })?;
            Ok(now - last_log.last_at <= window)
        }
    }
}

/// Per-week breakdown, newest first
pub fn week_breakdown(
    sessions: &[SessionRecord],
    now: NaiveDateTime,
    week_zero: Option<&WeekZeroInfo>,
    rules: &StreakRules,
) -> Result<Vec<WeekSummary>> {
    let today = now.date();
    let days = collect_days(sessions, today);
    let weeks = partition_weeks(&days, today, week_zero)?;

    Ok(weeks
        .iter()
        .map(|week| WeekSummary {
            week_start: week.start,
            status: week.status,
            logged_days: week.logged_days(),
            strength_sessions: week.strength_sessions,
            sick_days: week.sick_days(),
            neutral_days: week.neutral_days(),
            first_deload: week.first_deload,
            outcome: score_week(week, rules),
        })
        .collect())
}
