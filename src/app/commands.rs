//! Outbound actions the panel asks the host to perform.
//!
//! These map one-to-one onto host services.  The
//! [`PanelService`](super::service::PanelService) fires them through the
//! [`ActionPort`](super::ports::ActionPort) and refreshes afterwards; it
//! never waits for or verifies their effect.

use serde_json::{Map, Value, json};

/// Service domain the actions are registered under on the host.
pub const SERVICE_DOMAIN: &str = "smart_irrigation_ai";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Start a zone.  Without a duration the service fills one in from
    /// the zone's recommendation or the configured default.
    RunZone {
        zone_id: String,
        duration_minutes: Option<u32>,
    },

    /// Stop a single running zone.
    StopZone { zone_id: String },

    /// Stop every zone.
    StopAll,

    /// Ask the engine to recompute the schedule.
    CalculateSchedule,

    /// Skip the next watering, for one zone or (without an id) all zones.
    SkipNextWatering { zone_id: Option<String> },

    /// Suspend watering for `hours`.  `None` uses the configured default.
    RainDelay { hours: Option<u32> },
}

impl Action {
    pub fn service_name(&self) -> &'static str {
        match self {
            Self::RunZone { .. } => "run_zone",
            Self::StopZone { .. } => "stop_zone",
            Self::StopAll => "stop_all",
            Self::CalculateSchedule => "calculate_schedule",
            Self::SkipNextWatering { .. } => "skip_next_watering",
            Self::RainDelay { .. } => "rain_delay",
        }
    }

    /// Host service id, `<domain>.<service>`.
    pub fn qualified_service(&self) -> String {
        format!("{SERVICE_DOMAIN}.{}", self.service_name())
    }

    /// Service-call payload.  Absent optional fields are omitted.
    pub fn params(&self) -> Value {
        let mut params = Map::new();
        match self {
            Self::RunZone {
                zone_id,
                duration_minutes,
            } => {
                params.insert("zone_id".into(), json!(zone_id));
                if let Some(minutes) = duration_minutes {
                    params.insert("duration".into(), json!(minutes));
                }
            }
            Self::StopZone { zone_id } => {
                params.insert("zone_id".into(), json!(zone_id));
            }
            Self::SkipNextWatering { zone_id } => {
                if let Some(id) = zone_id {
                    params.insert("zone_id".into(), json!(id));
                }
            }
            Self::RainDelay { hours } => {
                if let Some(h) = hours {
                    params.insert("hours".into(), json!(h));
                }
            }
            Self::StopAll | Self::CalculateSchedule => {}
        }
        Value::Object(params)
    }

    /// Zone the action targets, if any.
    pub fn zone_id(&self) -> Option<&str> {
        match self {
            Self::RunZone { zone_id, .. } | Self::StopZone { zone_id } => Some(zone_id),
            Self::SkipNextWatering { zone_id } => zone_id.as_deref(),
            _ => None,
        }
    }
}
