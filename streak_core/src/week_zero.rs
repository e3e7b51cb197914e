//! Week Zero resolution.
//!
//! A user whose first-ever session lands Wednesday–Saturday gets a "Week 0":
//! the partial span up to the following Saturday, exempt from weekly minimums.
//! Week 1 starts on the next Sunday. Sunday–Tuesday starts begin Week 1
//! directly.

use crate::calendar::week_start;
use crate::WeekZeroInfo;
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Decide Week Zero for a user whose first session fell on `first_day`
pub fn resolve_week_zero(first_day: NaiveDate) -> Option<WeekZeroInfo> {
    match first_day.weekday() {
        Weekday::Sun | Weekday::Mon | Weekday::Tue => None,
        Weekday::Wed | Weekday::Thu | Weekday::Fri | Weekday::Sat => {
            let cycle_start = week_start(first_day)
                .ok()
                .and_then(|sunday| sunday.checked_add_days(Days::new(7)))?;

            tracing::info!(
                "First session on {} ({}), Week 1 starts {}",
                first_day,
                first_day.weekday(),
                cycle_start
            );

            Some(WeekZeroInfo {
                is_week_zero: true,
                week_zero_start_date: Some(first_day),
                cycle_start_date: Some(cycle_start),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_early_week_start_has_no_week_zero() {
        // Sunday, Monday, Tuesday
        for day in 3..=5 {
            assert!(resolve_week_zero(date(2024, 3, day)).is_none());
        }
    }

    #[test]
    fn test_late_week_start_creates_week_zero() {
        for day in 6..=9 {
            let info = resolve_week_zero(date(2024, 3, day)).unwrap();
            assert!(info.is_week_zero);
            assert_eq!(info.week_zero_start_date, Some(date(2024, 3, day)));
            assert_eq!(info.cycle_start_date, Some(date(2024, 3, 10)));
        }
    }
}
