//! In-memory host adapter.
//!
//! Holds a state snapshot, an optional full status and per-entity
//! calendar events, and implements every host-facing port over them.
//! Useful for demos, fixture replays and host-side tests.
//!
//! Actions are recorded and, for zone switches, applied: `run_zone`
//! turns the zone on, `stop_zone` / `stop_all` turn zones off.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDateTime;
use log::debug;

use crate::app::commands::Action;
use crate::app::ports::{ActionPort, CalendarPort, StatePort};
use crate::binner::CalendarEvent;
use crate::error::PortError;
use crate::state::{FullStatus, StateRecord, StateSnapshot, namespace_of};

#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    snapshot: StateSnapshot,
    full_status: Option<FullStatus>,
    calendars: HashMap<String, Vec<CalendarEvent>>,
    invoked: Vec<Action>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: StateSnapshot) -> Self {
        Self {
            snapshot,
            ..Self::default()
        }
    }

    // ── Fixture loading ───────────────────────────────────────

    /// Parse a JSON array of host state records.
    pub fn from_json_states(json: &str) -> anyhow::Result<Self> {
        let records: Vec<StateRecord> =
            serde_json::from_str(json).context("parsing state records")?;
        debug!("MemoryHost: loaded {} records", records.len());
        Ok(Self::with_snapshot(records.into_iter().collect()))
    }

    /// Read and parse a JSON file of host state records.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_json_states(&text).with_context(|| format!("loading {}", path.display()))
    }

    /// Parse a JSON array of events for `entity`, replacing any present.
    pub fn load_events_json(&mut self, entity: &str, json: &str) -> anyhow::Result<usize> {
        let events: Vec<CalendarEvent> = serde_json::from_str(json)
            .with_context(|| format!("parsing calendar events for {entity}"))?;
        let count = events.len();
        self.calendars.insert(entity.to_string(), events);
        Ok(count)
    }

    // ── Mutation ──────────────────────────────────────────────

    pub fn upsert(&mut self, record: StateRecord) {
        self.snapshot.insert(record);
    }

    pub fn set_full_status(&mut self, status: Option<FullStatus>) {
        self.full_status = status;
    }

    pub fn push_event(&mut self, entity: &str, event: CalendarEvent) {
        self.calendars.entry(entity.to_string()).or_default().push(event);
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn snapshot(&self) -> &StateSnapshot {
        &self.snapshot
    }

    /// Every action received, in order.
    pub fn invoked(&self) -> &[Action] {
        &self.invoked
    }

    fn set_switch(&mut self, id: &str, on: bool) {
        if let Some(record) = self.snapshot.get(id) {
            let mut record = record.clone();
            record.value = if on { "on" } else { "off" }.to_string();
            self.snapshot.insert(record);
        }
    }

    fn zone_switch_ids(&self) -> Vec<String> {
        self.snapshot
            .records()
            .filter(|r| namespace_of(&r.id) == "switch" && r.id.contains("zone_"))
            .map(|r| r.id.clone())
            .collect()
    }
}

impl StatePort for MemoryHost {
    fn state_snapshot(&mut self) -> Result<StateSnapshot, PortError> {
        Ok(self.snapshot.clone())
    }

    fn full_status(&mut self) -> Option<FullStatus> {
        self.full_status.clone()
    }
}

impl CalendarPort for MemoryHost {
    fn calendar_events(
        &mut self,
        entity: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEvent>, PortError> {
        Ok(self
            .calendars
            .get(entity)
            .map(|events| {
                events
                    .iter()
                    .filter(|e| {
                        let at = e.start.local_start();
                        at >= start && at < end
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl ActionPort for MemoryHost {
    fn invoke(&mut self, action: &Action) -> Result<(), PortError> {
        self.invoked.push(action.clone());
        match action {
            Action::RunZone { .. } | Action::StopZone { .. } => {
                let on = matches!(action, Action::RunZone { .. });
                if let Some(zone) = action.zone_id() {
                    self.set_switch(zone, on);
                }
            }
            Action::StopAll => {
                for id in self.zone_switch_ids() {
                    self.set_switch(&id, false);
                }
            }
            Action::CalculateSchedule
            | Action::SkipNextWatering { .. }
            | Action::RainDelay { .. } => {}
        }
        debug!("MemoryHost: {} {}", action.qualified_service(), action.params());
        Ok(())
    }
}
