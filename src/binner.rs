//! Calendar event binning.
//!
//! Events are dropped into the grid cell whose date matches the event's
//! start date (time of day discarded).  Each cell lists at most
//! [`MAX_DISPLAYED_EVENTS`] in input order and counts the rest as
//! overflow.  Events outside the visible grid are dropped.
//!
//! A start that carries a UTC offset is binned by its date in that
//! offset.  It is not converted to host-local time, so
//! `2024-06-14T03:00:00Z` lands on the 14th even for a UTC-7 host, where
//! it is still the 13th.  Hosts wanting local-day binning should send
//! local timestamps.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarGrid;
use crate::classify::{EventCategory, event_category};
use crate::error::PortError;

/// Display capacity of one day cell.
pub const MAX_DISPLAYED_EVENTS: usize = 3;

/// Fixed-capacity display list of one day cell.
pub type DisplayedEvents = heapless::Vec<DisplayedEvent, MAX_DISPLAYED_EVENTS>;

// ---------------------------------------------------------------------------
// Input events
// ---------------------------------------------------------------------------

/// Start of a calendar event as the host reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStart", into = "String")]
pub enum EventStart {
    /// All-day event.
    Date(NaiveDate),
    /// Timestamp carrying its own UTC offset.
    Instant(DateTime<FixedOffset>),
    /// Timestamp already in host-local time.
    Local(NaiveDateTime),
}

impl EventStart {
    /// Calendar date the event belongs to, in the event's own local time.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Date(d) => *d,
            Self::Instant(dt) => dt.date_naive(),
            Self::Local(dt) => dt.date(),
        }
    }

    /// Start as wall-clock time in the event's own offset; all-day events
    /// start at midnight.
    pub fn local_start(&self) -> NaiveDateTime {
        match self {
            Self::Date(d) => d.and_time(NaiveTime::MIN),
            Self::Instant(dt) => dt.naive_local(),
            Self::Local(dt) => *dt,
        }
    }
}

impl FromStr for EventStart {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::Date(d));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::Instant(dt));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(Self::Local)
            .ok_or(PortError::Malformed)
    }
}

impl fmt::Display for EventStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Instant(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Local(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

impl From<EventStart> for String {
    fn from(start: EventStart) -> Self {
        start.to_string()
    }
}

/// Either a bare string or the `{ "dateTime": .. } / { "date": .. }`
/// object shape some calendar APIs use.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStart {
    Text(String),
    Object {
        #[serde(default, alias = "dateTime")]
        date_time: Option<String>,
        #[serde(default)]
        date: Option<String>,
    },
}

impl TryFrom<RawStart> for EventStart {
    type Error = PortError;

    fn try_from(raw: RawStart) -> Result<Self, Self::Error> {
        match raw {
            RawStart::Text(s) => s.parse(),
            RawStart::Object { date_time, date } => date_time
                .or(date)
                .ok_or(PortError::Malformed)?
                .parse(),
        }
    }
}

/// One event returned by the host calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub start: EventStart,
    #[serde(default)]
    pub summary: String,
}

impl CalendarEvent {
    pub fn new(start: EventStart, summary: impl Into<String>) -> Self {
        Self {
            start,
            summary: summary.into(),
        }
    }

    pub fn all_day(date: NaiveDate, summary: impl Into<String>) -> Self {
        Self::new(EventStart::Date(date), summary)
    }
}

// ---------------------------------------------------------------------------
// Binning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedEvent {
    /// Summary cut to the configured character count.
    pub summary: String,
    /// Category of the full, untruncated summary.
    pub category: EventCategory,
}

/// Bin `events` into a copy of `grid`.
///
/// The copy starts with every cell cleared, so binning the same events
/// into the same grid twice gives the same result.
pub fn bin_events(
    grid: &CalendarGrid,
    events: &[CalendarEvent],
    max_per_day: usize,
    summary_max_chars: usize,
) -> CalendarGrid {
    let cap = max_per_day.min(MAX_DISPLAYED_EVENTS);
    let mut out = grid.clone();
    out.clear_events();

    let mut dropped = 0usize;
    for event in events {
        let Some(idx) = out.cell_index(event.start.date()) else {
            dropped += 1;
            continue;
        };
        let cell = &mut out.cells_mut()[idx];
        let shown = DisplayedEvent {
            summary: truncate_chars(&event.summary, summary_max_chars),
            category: event_category(&event.summary),
        };
        if cell.displayed_events.len() >= cap || cell.displayed_events.push(shown).is_err() {
            cell.overflow_count += 1;
        }
    }

    if dropped > 0 {
        debug!(
            "Dropped {dropped} calendar event(s) outside {}..={}",
            out.first_day(),
            out.last_day()
        );
    }
    out
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
