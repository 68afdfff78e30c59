//! Clock adapters.
//!
//! - [`SystemClock`] reads the host's local date via `chrono::Local`.
//! - [`FixedClock`] always answers the same date, for tests and replays.

use chrono::{Local, NaiveDate};

use crate::app::ports::ClockPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    /// `None` when the date does not exist.
    pub fn ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }
}

impl ClockPort for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
