//! Scripted host adapter for integration tests.
//!
//! Serves a fixed snapshot and event list, records every call, and can
//! be told to fail any port on demand.

use chrono::{NaiveDate, NaiveDateTime};
use irrigation_panel::app::commands::Action;
use irrigation_panel::app::events::PanelEvent;
use irrigation_panel::app::ports::{ActionPort, CalendarPort, StatePort, ViewSink};
use irrigation_panel::binner::CalendarEvent;
use irrigation_panel::state::{FullStatus, StateRecord, StateSnapshot};
use irrigation_panel::PortError;

// ── Calendar query record ─────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarQuery {
    pub entity: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

// ── MockHost ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MockHost {
    pub snapshot: StateSnapshot,
    pub full_status: Option<FullStatus>,
    /// Returned as-is for every query; range filtering is left to the core.
    pub events: Vec<CalendarEvent>,

    pub fail_snapshot: Option<PortError>,
    pub fail_calendar: Option<PortError>,
    pub fail_action: Option<PortError>,

    pub snapshot_calls: usize,
    pub calendar_queries: Vec<CalendarQuery>,
    pub actions: Vec<Action>,
}

#[allow(dead_code)]
impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample_state() -> Self {
        Self {
            snapshot: sample_snapshot(),
            ..Self::default()
        }
    }

    pub fn last_query(&self) -> Option<&CalendarQuery> {
        self.calendar_queries.last()
    }
}

impl StatePort for MockHost {
    fn state_snapshot(&mut self) -> Result<StateSnapshot, PortError> {
        self.snapshot_calls += 1;
        match self.fail_snapshot {
            Some(e) => Err(e),
            None => Ok(self.snapshot.clone()),
        }
    }

    fn full_status(&mut self) -> Option<FullStatus> {
        self.full_status.clone()
    }
}

impl CalendarPort for MockHost {
    fn calendar_events(
        &mut self,
        entity: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEvent>, PortError> {
        self.calendar_queries.push(CalendarQuery {
            entity: entity.to_string(),
            start,
            end,
        });
        match self.fail_calendar {
            Some(e) => Err(e),
            None => Ok(self.events.clone()),
        }
    }
}

impl ActionPort for MockHost {
    fn invoke(&mut self, action: &Action) -> Result<(), PortError> {
        self.actions.push(action.clone());
        match self.fail_action {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<PanelEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&PanelEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn last(&self) -> Option<&PanelEvent> {
        self.events.last()
    }
}

impl ViewSink for RecordingSink {
    fn emit(&mut self, event: &PanelEvent) {
        self.events.push(event.clone());
    }
}

// ── Fixtures ──────────────────────────────────────────────────

pub const ZONE_1: &str = "switch.smart_irrigation_zone_1";
pub const ZONE_2: &str = "switch.smart_irrigation_zone_2";

/// Two zones (one with a 12-minute recommendation), AI status asking
/// for water, controller idle, next run scheduled.
pub fn sample_snapshot() -> StateSnapshot {
    [
        StateRecord::new(ZONE_1, "off")
            .with_attr("friendly_name", "Smart Irrigation Front Lawn")
            .with_attr("ai_should_water", true)
            .with_attr("ai_duration", 12)
            .with_attr("last_watered", "2024-06-09T06:00:00+00:00"),
        StateRecord::new(ZONE_2, "off").with_attr("friendly_name", "Smart Irrigation Back Yard"),
        StateRecord::new("sensor.smart_irrigation_zone_1_moisture", "27"),
        StateRecord::new("sensor.smart_irrigation_ai_status", "water")
            .with_attr("zones_needing_water", 1)
            .with_attr("reason", "Dry soil in 1 zone")
            .with_attr("weather_factor", 1.2)
            .with_attr("rain_factor", 0.5),
        StateRecord::new("binary_sensor.smart_irrigation_is_running", "off"),
        StateRecord::new("sensor.smart_irrigation_next_run", "2024-06-11T05:00:00+00:00")
            .with_attr("zones_to_water", 1)
            .with_attr("total_runtime", 12),
        StateRecord::new("light.porch", "on"),
    ]
    .into_iter()
    .collect()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
