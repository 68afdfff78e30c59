//! Panel configuration parameters
//!
//! All tunable parameters for the irrigation panel core.
//! Hosts typically deserialize this from their own settings store.

use serde::{Deserialize, Serialize};

use crate::binner::MAX_DISPLAYED_EVENTS;
use crate::error::{Error, Result};

/// Core panel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    // --- Refresh ---
    /// Snapshot refresh interval (seconds)
    pub refresh_interval_secs: u32,

    // --- Record selection ---
    /// Id prefixes that mark a record as belonging to the irrigation domain
    pub domain_prefixes: Vec<String>,

    // --- Calendar ---
    /// Calendar entity queried for watering events
    pub calendar_entity: String,
    /// Events listed per day cell before the rest collapse into an overflow count
    pub max_events_per_day: usize,
    /// Summary length (characters) kept for display
    pub summary_max_chars: usize,

    // --- Actions ---
    /// Run duration (minutes) used when neither caller nor recommendation gives one
    pub default_run_minutes: u32,
    /// Rain delay length (hours) used by the rain-delay action
    pub rain_delay_hours: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            // Refresh
            refresh_interval_secs: 30,

            // Record selection
            domain_prefixes: [
                "sensor.smart_irrigation",
                "switch.smart_irrigation",
                "binary_sensor.smart_irrigation",
                "number.smart_irrigation",
                "select.smart_irrigation",
            ]
            .iter()
            .map(|p| (*p).to_string())
            .collect(),

            // Calendar
            calendar_entity: "calendar.smart_irrigation_schedule".to_string(),
            max_events_per_day: MAX_DISPLAYED_EVENTS,
            summary_max_chars: 15,

            // Actions
            default_run_minutes: 10,
            rain_delay_hours: 24,
        }
    }
}

impl PanelConfig {
    /// Reject values the service cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs == 0 {
            return Err(Error::Config("refresh_interval_secs must be > 0"));
        }
        if self.domain_prefixes.iter().all(|p| p.trim().is_empty()) {
            return Err(Error::Config("domain_prefixes must not be empty"));
        }
        if self.max_events_per_day == 0 || self.max_events_per_day > MAX_DISPLAYED_EVENTS {
            return Err(Error::Config("max_events_per_day must be within 1..=3"));
        }
        if self.summary_max_chars == 0 {
            return Err(Error::Config("summary_max_chars must be > 0"));
        }
        Ok(())
    }
}
