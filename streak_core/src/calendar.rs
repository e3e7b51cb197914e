//! Calendar helpers and week partitioning.
//!
//! Weeks are fixed Sunday–Saturday spans keyed by their Sunday, independent
//! of when the user started. Sessions dated after "today" are ignored.

use crate::{DayClass, Error, Result, SessionRecord, WeekZeroInfo};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

/// Sessions collapsed onto a single calendar day
#[derive(Clone, Debug, PartialEq)]
pub struct DayLog {
    pub class: DayClass,
    pub strength_sessions: u32,
    pub last_at: NaiveDateTime,
}

/// Why a week is exempt from the per-week minimums
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeekStatus {
    /// Fully in the past and subject to validity rules
    Complete,
    /// Contains today
    Current,
    /// Earliest week in history, starting after its Sunday
    Earliest,
    /// Overlaps the Week Zero span
    WeekZero,
}

impl WeekStatus {
    pub fn is_partial(&self) -> bool {
        !matches!(self, WeekStatus::Complete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeekStatus::Complete => "complete",
            WeekStatus::Current => "current",
            WeekStatus::Earliest => "earliest",
            WeekStatus::WeekZero => "week_zero",
        }
    }
}

/// One Sunday–Saturday week with its per-day classification
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarWeek {
    /// Sunday that keys this week
    pub start: NaiveDate,
    /// Classes for elapsed days, Sunday first; shorter than 7 for the current week
    pub days: Vec<DayClass>,
    pub strength_sessions: u32,
    pub first_deload: Option<NaiveDate>,
    pub status: WeekStatus,
}

impl CalendarWeek {
    /// Saturday closing this week
    pub fn end(&self) -> NaiveDate {
        self.start + Days::new(6)
    }

    pub fn logged_days(&self) -> u32 {
        count(&self.days, DayClass::is_logged)
    }

    pub fn sick_days(&self) -> u32 {
        count(&self.days, |c| *c == DayClass::Sick)
    }

    /// Unlogged or rest days; sick days are transparent
    pub fn neutral_days(&self) -> u32 {
        count(&self.days, DayClass::is_neutral)
    }

    /// Logged days strictly before the given day
    pub fn logged_days_before(&self, day: NaiveDate) -> u32 {
        let cutoff = (day - self.start).num_days().clamp(0, 7) as usize;
        count(&self.days[..cutoff.min(self.days.len())], DayClass::is_logged)
    }
}

fn count(days: &[DayClass], pred: impl Fn(&DayClass) -> bool) -> u32 {
    days.iter().filter(|c| pred(*c)).count() as u32
}

/// Sunday of the week containing `day`
pub fn week_start(day: NaiveDate) -> Result<NaiveDate> {
    let offset = u64::from(day.weekday().num_days_from_sunday());
    day.checked_sub_days(Days::new(offset))
        .ok_or_else(|| Error::Calendar(format!("no week start for {}", day)))
}

/// Whole calendar days from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Collapse records onto calendar days, dropping anything after `today`
pub fn collect_days(records: &[SessionRecord], today: NaiveDate) -> BTreeMap<NaiveDate, DayLog> {
    let mut days: BTreeMap<NaiveDate, DayLog> = BTreeMap::new();
    let mut future = 0usize;

    for record in records {
        let day = record.day();
        if day > today {
            future += 1;
            continue;
        }

        let class = DayClass::of(record);
        let strength = u32::from(record.kind.is_strength());
        days.entry(day)
            .and_modify(|log| {
                log.class = log.class.max(class);
                log.strength_sessions += strength;
                log.last_at = log.last_at.max(record.performed_at);
            })
            .or_insert(DayLog {
                class,
                strength_sessions: strength,
                last_at: record.performed_at,
            });
    }

    if future > 0 {
        tracing::debug!("Ignoring {} sessions dated after {}", future, today);
    }
    days
}

/// Partition history into calendar weeks, newest first
///
/// Covers every week from the one containing `today` back to the one
/// containing the earliest recorded day. Empty history yields no weeks.
pub fn partition_weeks(
    days: &BTreeMap<NaiveDate, DayLog>,
    today: NaiveDate,
    week_zero: Option<&WeekZeroInfo>,
) -> Result<Vec<CalendarWeek>> {
    let Some(first_day) = days.keys().next().copied() else {
        return Ok(Vec::new());
    };

    let oldest_start = week_start(first_day)?;
    let mut start = week_start(today)?;
    let mut weeks = Vec::new();

    while start >= oldest_start {
        weeks.push(build_week(days, start, today, first_day, week_zero));
        start = start
            .checked_sub_days(Days::new(7))
            .ok_or_else(|| Error::Calendar(format!("no week before {}", start)))?;
    }

    Ok(weeks)
}

fn build_week(
    days: &BTreeMap<NaiveDate, DayLog>,
    start: NaiveDate,
    today: NaiveDate,
    first_day: NaiveDate,
    week_zero: Option<&WeekZeroInfo>,
) -> CalendarWeek {
    let end = start + Days::new(6);
    let mut classes = Vec::with_capacity(7);
    let mut strength_sessions = 0;
    let mut first_deload = None;

    for day in start.iter_days().take(7).take_while(|d| *d <= today) {
        match days.get(&day) {
            Some(log) => {
                classes.push(log.class);
                strength_sessions += log.strength_sessions;
                if log.class == DayClass::Deload && first_deload.is_none() {
                    first_deload = Some(day);
                }
            }
            None => classes.push(DayClass::Unlogged),
        }
    }

    let overlaps_week_zero = week_zero
        .and_then(WeekZeroInfo::span)
        .map(|(zero_start, cycle_start)| start < cycle_start && end >= zero_start)
        .unwrap_or(false);

    let status = if end >= today {
        WeekStatus::Current
    } else if overlaps_week_zero {
        WeekStatus::WeekZero
    } else if first_day > start && first_day <= end {
        WeekStatus::Earliest
    } else {
        WeekStatus::Complete
    };

    CalendarWeek {
        start,
        days: classes,
        strength_sessions,
        first_deload,
        status,
    }
}
