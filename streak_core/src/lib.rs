#![forbid(unsafe_code)]

//! Core domain model and streak engine for Krep Streaks.
//!
//! This crate provides:
//! - Domain types (session records, calendar weeks, results)
//! - Session normalization from loosely-typed history
//! - Calendar week partitioning
//! - Streak and adherence engines
//! - Persistence helpers (session journal, schedule state, CSV export)

pub mod types;
pub mod error;
pub mod clock;
pub mod config;
pub mod logging;
pub mod normalize;
pub mod calendar;
pub mod week_zero;
pub mod streak;
pub mod adherence;
pub mod engine;
pub mod journal;
pub mod history;
pub mod schedule;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use clock::{ClockSource, FixedClock, SystemClock};
pub use config::Config;
pub use normalize::{normalize_sessions, normalize_value};
pub use calendar::{partition_weeks, CalendarWeek, WeekStatus};
pub use week_zero::resolve_week_zero;
pub use streak::{compute_streak, compute_streak_with, week_breakdown, WeekOutcome, WeekSummary};
pub use adherence::compute_adherence;
pub use engine::{evaluate, evaluate_records, ProgressReport};
pub use journal::{JsonlSink, SessionSink};
pub use history::load_history;
pub use schedule::ScheduleState;
