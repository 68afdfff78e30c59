//! Dashboard view model.
//!
//! [`build_dashboard`] turns indexed buckets (plus an optional richer
//! status from the host) into the structure the renderer draws.  It is
//! total: absent records, missing attributes and unparsable values all
//! degrade to neutral defaults.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::Value;

use crate::classify::{FactorPolarity, MoistureBand, factor_polarity, moisture_band};
use crate::indexer::{IndexedState, zone_key};
use crate::state::{FullStatus, StateRecord, value_as_bool, value_as_f64};

/// Reason shown when the AI status record carries none.
pub const DEFAULT_AI_REASON: &str = "No AI decision available";

const ZONE_NAME_PREFIX: &str = "Smart Irrigation ";

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// Top-level controller state, first matching rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerStatus {
    RainDelay,
    Running,
    SkipScheduled,
    Scheduled,
    Idle,
}

impl ControllerStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RainDelay => "rain_delay",
            Self::Running => "running",
            Self::SkipScheduled => "skip_scheduled",
            Self::Scheduled => "scheduled",
            Self::Idle => "idle",
        }
    }

    /// Parse the token published by the host's status sensor.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "rain_delay" => Some(Self::RainDelay),
            "running" => Some(Self::Running),
            "skip_scheduled" => Some(Self::SkipScheduled),
            "scheduled" => Some(Self::Scheduled),
            "idle" => Some(Self::Idle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiDecision {
    pub will_water: bool,
    pub zones_needing_water: u32,
    pub reason: String,
}

impl AiDecision {
    pub fn new(zones_needing_water: u32, reason: impl Into<String>) -> Self {
        Self {
            will_water: zones_needing_water > 0,
            zones_needing_water,
            reason: reason.into(),
        }
    }
}

/// The four adjustment factors, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Weather,
    SoilMoisture,
    RainSensor,
    Seasonal,
}

impl FactorKind {
    pub const ALL: [Self; 4] = [
        Self::Weather,
        Self::SoilMoisture,
        Self::RainSensor,
        Self::Seasonal,
    ];

    /// Attribute key on the AI status record.
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Weather => "weather_factor",
            Self::SoilMoisture => "moisture_factor",
            Self::RainSensor => "rain_factor",
            Self::Seasonal => "seasonal_factor",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Weather => "Weather",
            Self::SoilMoisture => "Soil Moisture",
            Self::RainSensor => "Rain Sensor",
            Self::Seasonal => "Seasonal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorReading {
    pub kind: FactorKind,
    pub name: &'static str,
    pub ratio: f64,
    pub polarity: FactorPolarity,
}

impl FactorReading {
    pub fn new(kind: FactorKind, ratio: f64) -> Self {
        Self {
            kind,
            name: kind.label(),
            ratio,
            polarity: factor_polarity(ratio),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub should_water: bool,
    pub duration_minutes: f64,
    pub skip_reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoistureReading {
    pub percent: f64,
    pub band: MoistureBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneView {
    pub id: String,
    pub name: String,
    pub is_running: bool,
    /// Passed through unformatted.
    pub last_run: Option<String>,
    pub recommendation: Option<Recommendation>,
    pub moisture: Option<MoistureReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextRunView {
    pub raw: String,
    pub at: Option<DateTime<FixedOffset>>,
    pub zones_to_water: Option<u32>,
    pub total_runtime_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub factor: FactorReading,
    pub condition: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingView {
    pub id: String,
    pub name: String,
    pub value: String,
    pub unit: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Choices for select-style settings; empty for numbers.
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStatus {
    pub zones_configured: Option<u32>,
    pub zones_needing_water: Option<u32>,
    pub last_calculation: Option<String>,
    pub last_run: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub status: ControllerStatus,
    /// End of an active rain delay, passed through unformatted.
    pub rain_delay_until: Option<String>,
    pub is_running: bool,
    pub ai: AiDecision,
    pub factors: Vec<FactorReading>,
    pub zones: Vec<ZoneView>,
    pub next_run: Option<NextRunView>,
    pub weather: Option<WeatherView>,
    pub settings: Vec<SettingView>,
    pub model: Option<ModelStatus>,
}

impl Default for DashboardView {
    fn default() -> Self {
        build_dashboard(&IndexedState::default(), None)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the dashboard from indexed buckets.  Never fails.
pub fn build_dashboard(indexed: &IndexedState<'_>, full: Option<&FullStatus>) -> DashboardView {
    let ai = ai_decision(indexed.ai_status);
    let is_running = indexed
        .is_running
        .or_else(|| full.and_then(|f| f.is_running))
        .unwrap_or(false);

    DashboardView {
        status: controller_status(indexed, is_running, &ai),
        rain_delay_until: status_sources(indexed)
            .find_map(|r| r.attr("rain_delay_until").and_then(timestamp_text)),
        is_running,
        factors: factors(indexed.ai_status),
        zones: indexed
            .zones
            .iter()
            .map(|zone| zone_view(zone, indexed.moisture_for(zone)))
            .collect(),
        next_run: next_run(indexed.schedule, full),
        weather: indexed.weather.map(weather_view),
        settings: indexed.settings.iter().copied().map(setting_view).collect(),
        model: full.map(model_status),
        ai,
    }
}

/// Records that may carry controller-wide flags, status sensor first.
fn status_sources<'a>(indexed: &IndexedState<'a>) -> impl Iterator<Item = &'a StateRecord> {
    [indexed.status, indexed.ai_status, indexed.schedule]
        .into_iter()
        .flatten()
}

/// The status sensor's own token wins.  Without a usable token the
/// status is derived from the other records, first match wins.
fn controller_status(indexed: &IndexedState<'_>, is_running: bool, ai: &AiDecision) -> ControllerStatus {
    if let Some(status) = indexed
        .status
        .and_then(|r| ControllerStatus::from_token(&r.value))
    {
        return status;
    }

    let flag = |key: &str| -> bool {
        status_sources(indexed)
            .any(|r| r.attr(key).is_some_and(|v| attr_present(v) && value_as_bool(v) != Some(false)))
    };

    if flag("rain_delay_until") {
        ControllerStatus::RainDelay
    } else if is_running {
        ControllerStatus::Running
    } else if status_sources(indexed).any(|r| r.attr_bool("skip_next") == Some(true)) {
        ControllerStatus::SkipScheduled
    } else if ai.will_water {
        ControllerStatus::Scheduled
    } else {
        ControllerStatus::Idle
    }
}

/// Null and blank strings mean "not set" for timestamp-like attributes.
fn attr_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn ai_decision(record: Option<&StateRecord>) -> AiDecision {
    let Some(record) = record else {
        return AiDecision::new(0, DEFAULT_AI_REASON);
    };
    let zones = record.attr_f64("zones_needing_water").map_or(0, non_negative_u32);
    let reason = record
        .attr_str("reason")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_AI_REASON);
    AiDecision::new(zones, reason)
}

fn factors(record: Option<&StateRecord>) -> Vec<FactorReading> {
    FactorKind::ALL
        .iter()
        .map(|&kind| {
            let ratio = record.and_then(|r| r.attr_f64(kind.attribute())).unwrap_or(1.0);
            FactorReading::new(kind, ratio)
        })
        .collect()
}

fn zone_view(zone: &StateRecord, moisture: Option<&StateRecord>) -> ZoneView {
    let last_run = ["last_run", "last_watered"]
        .iter()
        .find_map(|k| zone.attr(k).and_then(timestamp_text));

    ZoneView {
        id: zone.id.clone(),
        name: zone_name(zone),
        is_running: zone.is_on(),
        last_run,
        recommendation: recommendation(zone),
        moisture: moisture.and_then(StateRecord::value_f64).map(|percent| MoistureReading {
            percent,
            band: moisture_band(percent),
        }),
    }
}

fn zone_name(zone: &StateRecord) -> String {
    if let Some(name) = zone.friendly_name() {
        let stripped = name.strip_prefix(ZONE_NAME_PREFIX).unwrap_or(name).trim();
        if !stripped.is_empty() {
            return stripped.to_string();
        }
    }
    let key = zone_key(&zone.id).unwrap_or(&zone.id);
    format!("Zone {}", title_case(key))
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Nested `recommendation` object first, then the flat `ai_*` attributes.
fn recommendation(zone: &StateRecord) -> Option<Recommendation> {
    if let Some(Value::Object(nested)) = zone.attr("recommendation") {
        return Some(Recommendation {
            should_water: nested.get("should_water").and_then(value_as_bool).unwrap_or(false),
            duration_minutes: nested
                .get("duration_minutes")
                .and_then(value_as_f64)
                .unwrap_or(0.0),
            skip_reason: nested
                .get("skip_reason")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        });
    }

    let should_water = zone.attr_bool("ai_should_water")?;
    Some(Recommendation {
        should_water,
        duration_minutes: zone.attr_f64("ai_duration").unwrap_or(0.0),
        skip_reason: zone.attr_str("ai_skip_reason").unwrap_or_default().to_string(),
    })
}

fn next_run(schedule: Option<&StateRecord>, full: Option<&FullStatus>) -> Option<NextRunView> {
    // A placeholder value counts as a missing record.
    match schedule.filter(|r| is_known(&r.value)) {
        Some(record) => Some(NextRunView {
            raw: record.value.clone(),
            at: parse_timestamp(&record.value),
            zones_to_water: record.attr_f64("zones_to_water").map(non_negative_u32),
            total_runtime_minutes: record.attr_f64("total_runtime"),
        }),
        None => full
            .and_then(|f| f.next_run.as_deref())
            .filter(|s| is_known(s))
            .map(|raw| NextRunView {
                raw: raw.to_string(),
                at: parse_timestamp(raw),
                zones_to_water: None,
                total_runtime_minutes: None,
            }),
    }
}

fn weather_view(record: &StateRecord) -> WeatherView {
    WeatherView {
        factor: FactorReading::new(FactorKind::Weather, record.value_f64().unwrap_or(1.0)),
        condition: record.attr_str("condition").map(str::to_string),
        temperature: record.attr_f64("temperature"),
        humidity: record.attr_f64("humidity"),
    }
}

fn setting_view(record: &StateRecord) -> SettingView {
    let options = match record.attr("options") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    SettingView {
        id: record.id.clone(),
        name: record
            .friendly_name()
            .map_or_else(|| record.id.clone(), str::to_string),
        value: record.value.clone(),
        unit: record.attr_str("unit_of_measurement").map(str::to_string),
        min: record.attr_f64("min"),
        max: record.attr_f64("max"),
        options,
    }
}

fn model_status(full: &FullStatus) -> ModelStatus {
    ModelStatus {
        zones_configured: full.zones_configured,
        zones_needing_water: full.zones_needing_water,
        last_calculation: full.last_calculation.clone(),
        last_run: full.last_run.clone(),
    }
}

/// Host placeholders for "no value".
fn is_known(value: &str) -> bool {
    let v = value.trim();
    !(v.is_empty() || v == "unknown" || v == "unavailable" || v == "None")
}

fn timestamp_text(value: &Value) -> Option<String> {
    value.as_str().filter(|s| is_known(s)).map(str::to_string)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim()).ok()
}

fn non_negative_u32(v: f64) -> u32 {
    if v <= 0.0 {
        0
    } else if v >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        v as u32
    }
}
