//! Month calendar grid.
//!
//! A grid is always six full weeks (42 cells) starting on the Sunday on
//! or before the first of the month, so its size never changes between
//! months.  "Today" is passed in rather than read from the clock.
//!
//! ```text
//!   Su  Mo  Tu  We  Th  Fr  Sa
//!  ┌───┬───┬───┬───┬───┬───┬───┐
//!  │28 │29 │30 │31 │ 1 │ 2 │ 3 │  ◀── leading days of previous month
//!  │ … │   │   │   │   │   │   │
//!  │ … │ 1 │ 2 │ 3 │ 4 │ 5 │ 6 │  ◀── trailing days of next month
//!  └───┴───┴───┴───┴───┴───┴───┘
//! ```

use core::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::binner::DisplayedEvents;

/// Cells in every grid.
pub const GRID_CELLS: usize = 42;

// Keeps every date arithmetic step well inside chrono's range.
const MIN_YEAR: i32 = -100_000;
const MAX_YEAR: i32 = 100_000;

// ---------------------------------------------------------------------------
// Month reference
// ---------------------------------------------------------------------------

/// A calendar month with a zero-based month index (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthRef {
    year: i32,
    month0: u32,
}

impl MonthRef {
    /// Month indices past 11 carry into the year.
    pub fn new(year: i32, month0: u32) -> Self {
        let carry = i32::try_from(month0 / 12).unwrap_or(i32::MAX);
        Self {
            year: year.saturating_add(carry).clamp(MIN_YEAR, MAX_YEAR),
            month0: month0 % 12,
        }
    }

    /// Month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month0())
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month0(self) -> u32 {
        self.month0
    }

    /// One-based month number (1 = January).
    pub fn month(self) -> u32 {
        self.month0 + 1
    }

    pub fn previous(self) -> Self {
        if self.month0 == 0 {
            Self::new(self.year - 1, 11)
        } else {
            Self::new(self.year, self.month0 - 1)
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.year, self.month0 + 1)
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month(), 1).unwrap_or_default()
    }

    pub fn days_in_month(self) -> u32 {
        let next = self.next().first_day();
        u32::try_from(next.signed_duration_since(self.first_day()).num_days()).unwrap_or(0)
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month())
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDayCell {
    pub date: NaiveDate,
    pub day_number: u32,
    pub is_current_month: bool,
    pub is_today: bool,
    pub displayed_events: DisplayedEvents,
    /// Events for this day beyond the display cap.
    pub overflow_count: usize,
}

impl CalendarDayCell {
    fn new(date: NaiveDate, month: MonthRef, today: NaiveDate) -> Self {
        Self {
            date,
            day_number: date.day(),
            is_current_month: MonthRef::containing(date) == month,
            is_today: date == today,
            displayed_events: DisplayedEvents::new(),
            overflow_count: 0,
        }
    }

    /// Total events binned to this day.
    pub fn event_count(&self) -> usize {
        self.displayed_events.len() + self.overflow_count
    }

    pub(crate) fn clear_events(&mut self) {
        self.displayed_events.clear();
        self.overflow_count = 0;
    }
}

/// Six weeks of day cells for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarGrid {
    month: MonthRef,
    today: NaiveDate,
    cells: Vec<CalendarDayCell>,
}

impl CalendarGrid {
    pub fn month(&self) -> MonthRef {
        self.month
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn cells(&self) -> &[CalendarDayCell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [CalendarDayCell] {
        &mut self.cells
    }

    /// Rows of seven cells, Sunday first.
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDayCell]> {
        self.cells.chunks(7)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.cells.first().map_or(self.today, |c| c.date)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.cells.last().map_or(self.today, |c| c.date)
    }

    /// Half-open local range covering every visible day:
    /// `[first_day 00:00, last_day + 1 00:00)`.
    pub fn fetch_range(&self) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.first_day().and_time(NaiveTime::MIN);
        let end = self
            .last_day()
            .succ_opt()
            .unwrap_or_else(|| self.last_day())
            .and_time(NaiveTime::MIN);
        (start, end)
    }

    /// Position of `date` in the grid, if visible.
    pub fn cell_index(&self, date: NaiveDate) -> Option<usize> {
        let offset = date.signed_duration_since(self.first_day()).num_days();
        usize::try_from(offset).ok().filter(|&i| i < self.cells.len())
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarDayCell> {
        self.cell_index(date).map(|i| &self.cells[i])
    }

    /// Total events across the grid, displayed or overflowed.
    pub fn event_count(&self) -> usize {
        self.cells.iter().map(CalendarDayCell::event_count).sum()
    }

    pub(crate) fn clear_events(&mut self) {
        for cell in &mut self.cells {
            cell.clear_events();
        }
    }
}

/// Build the 42-cell grid for `month`, with no events.
pub fn build_month_grid(month: MonthRef, today: NaiveDate) -> CalendarGrid {
    let first = month.first_day();
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let start = first
        .checked_sub_days(chrono::Days::new(lead))
        .unwrap_or(first);

    let cells: Vec<CalendarDayCell> = start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| CalendarDayCell::new(date, month, today))
        .collect();

    debug_assert_eq!(cells.len(), GRID_CELLS);

    CalendarGrid { month, today, cells }
}
