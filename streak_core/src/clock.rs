//! Clock sources for day-boundary math.
//!
//! Engine functions take `now` as an explicit argument. A `ClockSource` is
//! sampled once at the call boundary and the value threaded through.

use chrono::{Local, NaiveDateTime};

/// Supplies the local wall-clock time
pub trait ClockSource {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system's local time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl ClockSource for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
