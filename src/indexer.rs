//! Snapshot indexing at the ingestion boundary.
//!
//! Every record in a snapshot is tagged exactly once with a
//! [`RecordTag`] and then dropped into a typed bucket.  Everything
//! downstream dispatches on the tag; no other module looks at id
//! substrings.
//!
//! ```text
//!  StateSnapshot ──▶ DomainFilter ──▶ tag_record ──▶ IndexedState
//!                        │                │
//!                        └── dropped ◀────┘ (no tag)
//! ```
//!
//! The rules lean on the host's naming convention (`zone_` marker plus
//! the `switch` namespace for zones).  That is a convention, not a
//! structural guarantee: a future entity whose id happens to contain the
//! marker would be misfiled.

use log::debug;

use crate::config::PanelConfig;
use crate::state::{StateRecord, StateSnapshot, namespace_of};

const ZONE_MARKER: &str = "zone_";
const MOISTURE_SUFFIX: &str = "_moisture";
const STATUS_SUFFIX: &str = "_status";

/// Domain concept a record was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordTag {
    /// Next scheduled run (timestamp value plus schedule attributes).
    Schedule,
    /// A controllable zone valve.
    Zone,
    /// The AI decision record carrying factors and the zone count.
    AiStatus,
    /// Controller status sensor; its value is already a status token.
    Status,
    /// Weather adjustment factor.
    Weather,
    /// Controller-wide running flag.
    IsRunning,
    /// Per-zone soil moisture percentage.
    Moisture,
    /// User-adjustable number / select setting.
    Setting,
}

/// Selects records whose id starts with one of the domain prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainFilter {
    prefixes: Vec<String>,
}

impl DomainFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &PanelConfig) -> Self {
        Self::new(config.domain_prefixes.iter().cloned())
    }

    pub fn matches(&self, id: &str) -> bool {
        self.prefixes.iter().any(|p| id.starts_with(p.as_str()))
    }
}

/// Classify one record id.  Highest-priority rule wins; `None` means the
/// record is not part of the irrigation view.
pub fn tag_record(id: &str, filter: &DomainFilter) -> Option<RecordTag> {
    if !filter.matches(id) {
        return None;
    }
    let namespace = namespace_of(id);

    if id.contains("next_run") {
        Some(RecordTag::Schedule)
    } else if id.contains(ZONE_MARKER) && namespace == "switch" {
        Some(RecordTag::Zone)
    } else if id.contains("ai_status") {
        Some(RecordTag::AiStatus)
    } else if namespace == "sensor" && id.ends_with(STATUS_SUFFIX) {
        Some(RecordTag::Status)
    } else if id.contains("weather_factor") {
        Some(RecordTag::Weather)
    } else if id.contains("is_running") {
        Some(RecordTag::IsRunning)
    } else if namespace == "sensor" && id.contains(ZONE_MARKER) && id.ends_with(MOISTURE_SUFFIX) {
        Some(RecordTag::Moisture)
    } else if namespace == "number" || namespace == "select" {
        Some(RecordTag::Setting)
    } else {
        None
    }
}

/// Key shared by a zone switch and its moisture sensor: the text after
/// the last `zone_` marker, without a trailing `_moisture`.
pub fn zone_key(id: &str) -> Option<&str> {
    let start = id.rfind(ZONE_MARKER)? + ZONE_MARKER.len();
    let rest = &id[start..];
    let key = rest.strip_suffix(MOISTURE_SUFFIX).unwrap_or(rest);
    (!key.is_empty()).then_some(key)
}

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

/// Typed buckets borrowed from one snapshot.
///
/// Multi-valued buckets are sorted by id.  When a single-valued bucket
/// sees several candidates, the smallest id wins so the result does not
/// depend on snapshot iteration order.
#[derive(Debug, Clone, Default)]
pub struct IndexedState<'a> {
    pub zones: Vec<&'a StateRecord>,
    pub schedule: Option<&'a StateRecord>,
    pub ai_status: Option<&'a StateRecord>,
    pub status: Option<&'a StateRecord>,
    pub weather: Option<&'a StateRecord>,
    /// `None` when no running record exists in the snapshot.
    pub is_running: Option<bool>,
    pub moisture: Vec<&'a StateRecord>,
    pub settings: Vec<&'a StateRecord>,
}

impl<'a> IndexedState<'a> {
    /// Moisture sensor for the given zone switch, if any.
    pub fn moisture_for(&self, zone: &StateRecord) -> Option<&'a StateRecord> {
        let key = zone_key(&zone.id)?;
        self.moisture
            .iter()
            .copied()
            .find(|m| zone_key(&m.id) == Some(key))
    }
}

/// Scan a snapshot and bucket every domain record.
pub fn index_snapshot<'a>(snapshot: &'a StateSnapshot, filter: &DomainFilter) -> IndexedState<'a> {
    let mut indexed = IndexedState::default();
    let mut running: Option<&StateRecord> = None;

    for record in snapshot.records() {
        let Some(tag) = tag_record(&record.id, filter) else {
            continue;
        };
        match tag {
            RecordTag::Schedule => keep_smallest(&mut indexed.schedule, record),
            RecordTag::Zone => indexed.zones.push(record),
            RecordTag::AiStatus => keep_smallest(&mut indexed.ai_status, record),
            RecordTag::Status => keep_smallest(&mut indexed.status, record),
            RecordTag::Weather => keep_smallest(&mut indexed.weather, record),
            RecordTag::IsRunning => keep_smallest(&mut running, record),
            RecordTag::Moisture => indexed.moisture.push(record),
            RecordTag::Setting => indexed.settings.push(record),
        }
    }

    indexed.is_running = running.map(StateRecord::is_on);
    indexed.zones.sort_by(|a, b| a.id.cmp(&b.id));
    indexed.moisture.sort_by(|a, b| a.id.cmp(&b.id));
    indexed.settings.sort_by(|a, b| a.id.cmp(&b.id));

    debug!(
        "Indexed {} records: {} zones, {} settings, ai_status={}, schedule={}",
        snapshot.len(),
        indexed.zones.len(),
        indexed.settings.len(),
        indexed.ai_status.is_some(),
        indexed.schedule.is_some(),
    );
    indexed
}

fn keep_smallest<'a>(slot: &mut Option<&'a StateRecord>, candidate: &'a StateRecord) {
    match slot {
        Some(current) if current.id <= candidate.id => {}
        _ => *slot = Some(candidate),
    }
}
