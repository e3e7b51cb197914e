//! Core domain types for the streak engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Session kinds and normalized session records
//! - Per-day classification
//! - Week Zero schedule information
//! - Engine results and rule sets

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Session Types
// ============================================================================

/// Type of logged session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Strength,
    Cardio,
    Hiit,
    Yoga,
    Stretch,
    Rest,
    SickDay,
}

impl SessionKind {
    /// All kinds, in declaration order
    pub const ALL: [SessionKind; 7] = [
        SessionKind::Strength,
        SessionKind::Cardio,
        SessionKind::Hiit,
        SessionKind::Yoga,
        SessionKind::Stretch,
        SessionKind::Rest,
        SessionKind::SickDay,
    ];

    /// Parse a kind tag as written by the storage layer
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "strength" => Some(SessionKind::Strength),
            "cardio" => Some(SessionKind::Cardio),
            "hiit" => Some(SessionKind::Hiit),
            "yoga" => Some(SessionKind::Yoga),
            "stretch" | "stretching" => Some(SessionKind::Stretch),
            "rest" => Some(SessionKind::Rest),
            "sick_day" | "sick" => Some(SessionKind::SickDay),
            _ => None,
        }
    }

    /// Tag used when writing this kind back out
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Strength => "strength",
            SessionKind::Cardio => "cardio",
            SessionKind::Hiit => "hiit",
            SessionKind::Yoga => "yoga",
            SessionKind::Stretch => "stretch",
            SessionKind::Rest => "rest",
            SessionKind::SickDay => "sick_day",
        }
    }

    /// Counts toward a week's strength tally
    pub fn is_strength(&self) -> bool {
        matches!(self, SessionKind::Strength)
    }
}

/// One performed set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetLog {
    pub reps: i32,
    #[serde(default)]
    pub weight: f64,
}

/// Sets performed for a single exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ExerciseLog {
    #[serde(default)]
    pub sets: Vec<SetLog>,
}

/// A normalized session read from history
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    /// Local wall-clock time the session was performed
    pub performed_at: NaiveDateTime,
    pub kind: SessionKind,
    #[serde(default)]
    pub is_deload: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub exercises: BTreeMap<String, ExerciseLog>,
}

impl SessionRecord {
    /// Create a record with no exercise detail
    pub fn new(performed_at: NaiveDateTime, kind: SessionKind) -> Self {
        Self {
            performed_at,
            kind,
            is_deload: false,
            exercises: BTreeMap::new(),
        }
    }

    /// Mark this record as a deload session
    pub fn deload(mut self) -> Self {
        self.is_deload = true;
        self
    }

    /// Calendar day this session belongs to
    pub fn day(&self) -> NaiveDate {
        self.performed_at.date()
    }

    /// Total weight moved across all sets
    pub fn volume(&self) -> f64 {
        self.exercises
            .values()
            .flat_map(|e| e.sets.iter())
            .map(|s| f64::from(s.reps) * s.weight)
            .sum()
    }
}

// ============================================================================
// Day Classification
// ============================================================================

/// Classification of one calendar day, derived from that day's sessions
///
/// When a day holds several records the highest-precedence class wins:
/// Deload > LoggedStrength > LoggedOther > Rest > Sick.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DayClass {
    Unlogged,
    Sick,
    Rest,
    LoggedOther,
    LoggedStrength,
    Deload,
}

impl DayClass {
    /// Class contributed by a single record
    pub fn of(record: &SessionRecord) -> Self {
        if record.is_deload {
            return DayClass::Deload;
        }
        match record.kind {
            SessionKind::Strength => DayClass::LoggedStrength,
            SessionKind::Cardio | SessionKind::Hiit | SessionKind::Yoga | SessionKind::Stretch => {
                DayClass::LoggedOther
            }
            SessionKind::Rest => DayClass::Rest,
            SessionKind::SickDay => DayClass::Sick,
        }
    }

    /// Day counts as a logged workout day
    pub fn is_logged(&self) -> bool {
        matches!(
            self,
            DayClass::LoggedStrength | DayClass::LoggedOther | DayClass::Deload
        )
    }

    /// Day counts toward the weekly neutral-day tolerance
    pub fn is_neutral(&self) -> bool {
        matches!(self, DayClass::Unlogged | DayClass::Rest)
    }
}

// ============================================================================
// Schedule and Plan Types
// ============================================================================

/// Week Zero schedule information, owned by the schedule-tracking collaborator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct WeekZeroInfo {
    pub is_week_zero: bool,
    pub week_zero_start_date: Option<NaiveDate>,
    /// First Sunday after Week Zero (start of Week 1)
    pub cycle_start_date: Option<NaiveDate>,
}

impl WeekZeroInfo {
    /// Half-open span `[start, cycle_start)` when Week Zero is active
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        if !self.is_week_zero {
            return None;
        }
        match (self.week_zero_start_date, self.cycle_start_date) {
            (Some(start), Some(cycle)) if start < cycle => Some((start, cycle)),
            _ => None,
        }
    }
}

/// Active training plan; accepted for plan-relative adherence, unused today
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ActivePlan {
    pub name: String,
    pub sessions_per_week: Option<u32>,
}

// ============================================================================
// Rules and Results
// ============================================================================

/// How sick days affect a week's minimum strength requirement
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SickDayRule {
    /// Fixed minimum regardless of sick days
    #[default]
    Flat,
    /// 2 sick days => 2 strength, 3 => 1, 4+ => none
    Sliding,
}

/// How "recent enough" is judged for the current streak
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GracePolicy {
    /// Last workout day must be today or yesterday
    #[default]
    CalendarDay,
    /// Last workout must be within `grace_hours` of now
    Rolling,
}

/// Week validity rules applied by the streak engine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakRules {
    #[serde(default = "default_min_strength_sessions")]
    pub min_strength_sessions: u32,

    #[serde(default = "default_max_neutral_days")]
    pub max_neutral_days: u32,

    #[serde(default)]
    pub sick_day_rule: SickDayRule,

    #[serde(default)]
    pub grace: GracePolicy,

    #[serde(default = "default_grace_hours")]
    pub grace_hours: i64,
}

impl Default for StreakRules {
    fn default() -> Self {
        Self {
            min_strength_sessions: default_min_strength_sessions(),
            max_neutral_days: default_max_neutral_days(),
            sick_day_rule: SickDayRule::default(),
            grace: GracePolicy::default(),
            grace_hours: default_grace_hours(),
        }
    }
}

impl StreakRules {
    /// Strength sessions a complete week needs, given its sick-day count
    pub fn required_strength(&self, sick_days: u32) -> u32 {
        match self.sick_day_rule {
            SickDayRule::Flat => self.min_strength_sessions,
            SickDayRule::Sliding => {
                let reduction = match sick_days {
                    0 | 1 => 0,
                    n => n - 1,
                };
                self.min_strength_sessions.saturating_sub(reduction)
            }
        }
    }
}

fn default_min_strength_sessions() -> u32 {
    3
}

fn default_max_neutral_days() -> u32 {
    1
}

fn default_grace_hours() -> i64 {
    24
}

/// Current and longest streak, in days
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StreakResult {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Adherence as an integer percentage in `[0, 100]`
pub type AdherenceResult = u8;

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_session_kinds() {
        for kind in SessionKind::ALL {
            assert_eq!(SessionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(SessionKind::parse("SICK"), Some(SessionKind::SickDay));
        assert_eq!(SessionKind::parse(" Strength "), Some(SessionKind::Strength));
        assert_eq!(SessionKind::parse("pilates"), None);
    }

    #[test]
    fn test_day_class_precedence() {
        let strength = SessionRecord::new(at(2024, 3, 4), SessionKind::Strength);
        let sick = SessionRecord::new(at(2024, 3, 4), SessionKind::SickDay);
        let deload = SessionRecord::new(at(2024, 3, 4), SessionKind::Cardio).deload();

        let class = [&sick, &strength]
            .iter()
            .map(|r| DayClass::of(r))
            .max()
            .unwrap();
        assert_eq!(class, DayClass::LoggedStrength);

        let class = [&strength, &deload]
            .iter()
            .map(|r| DayClass::of(r))
            .max()
            .unwrap();
        assert_eq!(class, DayClass::Deload);
    }

    #[test]
    fn test_neutral_and_logged_classes() {
        assert!(DayClass::Unlogged.is_neutral());
        assert!(DayClass::Rest.is_neutral());
        assert!(!DayClass::Sick.is_neutral());
        assert!(!DayClass::Sick.is_logged());
        assert!(DayClass::LoggedOther.is_logged());
    }

    #[test]
    fn test_sliding_rule_requirements() {
        let rules = StreakRules {
            sick_day_rule: SickDayRule::Sliding,
            ..StreakRules::default()
        };
        assert_eq!(rules.required_strength(0), 3);
        assert_eq!(rules.required_strength(1), 3);
        assert_eq!(rules.required_strength(2), 2);
        assert_eq!(rules.required_strength(3), 1);
        assert_eq!(rules.required_strength(4), 0);
        assert_eq!(rules.required_strength(7), 0);

        let flat = StreakRules::default();
        assert_eq!(flat.required_strength(5), 3);
    }

    #[test]
    fn test_week_zero_span() {
        let info = WeekZeroInfo {
            is_week_zero: true,
            week_zero_start_date: NaiveDate::from_ymd_opt(2024, 3, 6),
            cycle_start_date: NaiveDate::from_ymd_opt(2024, 3, 10),
        };
        assert_eq!(
            info.span(),
            Some((
                NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
            ))
        );

        let inactive = WeekZeroInfo::default();
        assert!(inactive.span().is_none());
    }

    #[test]
    fn test_volume() {
        let mut record = SessionRecord::new(at(2024, 3, 4), SessionKind::Strength);
        record.exercises.insert(
            "squat".into(),
            ExerciseLog {
                sets: vec![
                    SetLog { reps: 5, weight: 100.0 },
                    SetLog { reps: 5, weight: 110.0 },
                ],
            },
        );
        assert_eq!(record.volume(), 1050.0);
    }
}
