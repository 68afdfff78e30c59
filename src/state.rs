//! Host state records as the core sees them.
//!
//! The external state store owns these records; the core only reads
//! snapshots of them and never mutates a record in place.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single key-value entry from the host state store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    #[serde(alias = "entity_id")]
    pub id: String,
    #[serde(alias = "state")]
    pub value: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl StateRecord {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            attributes: Map::new(),
        }
    }

    /// Builder-style attribute insertion, mostly for hosts and tests.
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// Text before the first `.` of the id (`switch`, `sensor`, ...).
    pub fn namespace(&self) -> &str {
        namespace_of(&self.id)
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Numeric attribute.  Accepts JSON numbers and numeric strings;
    /// anything else (including NaN / infinity) is `None`.
    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        self.attr(key).and_then(value_as_f64)
    }

    /// String attribute; non-string JSON values are `None`.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(Value::as_str)
    }

    /// Boolean attribute.  Accepts JSON booleans, `"on"`/`"true"` strings
    /// and non-zero numbers.
    pub fn attr_bool(&self, key: &str) -> Option<bool> {
        self.attr(key).and_then(value_as_bool)
    }

    /// Numeric reading of the record's own value.
    pub fn value_f64(&self) -> Option<f64> {
        parse_finite(&self.value)
    }

    /// True when the record's value is the host's "on" token.
    pub fn is_on(&self) -> bool {
        self.value == "on"
    }

    pub fn friendly_name(&self) -> Option<&str> {
        self.attr_str("friendly_name").filter(|s| !s.trim().is_empty())
    }
}

pub(crate) fn namespace_of(id: &str) -> &str {
    id.split_once('.').map_or("", |(ns, _)| ns)
}

pub(crate) fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_finite(s),
        _ => None,
    }
}

pub(crate) fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "on" | "true" => Some(true),
            "off" | "false" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        _ => None,
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Every record known to the host at one instant, keyed by id.
///
/// Iteration order is unspecified.  A snapshot is rebuilt wholesale on
/// every refresh; the core never diffs two snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateSnapshot {
    records: HashMap<String, StateRecord>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later records replace earlier ones with the same id.
    pub fn from_records(records: impl IntoIterator<Item = StateRecord>) -> Self {
        records.into_iter().collect()
    }

    /// Insert a record.  A record with the same id is replaced.
    pub fn insert(&mut self, record: StateRecord) {
        self.records.insert(record.id.clone(), record);
    }

    pub fn get(&self, id: &str) -> Option<&StateRecord> {
        self.records.get(id)
    }

    pub fn records(&self) -> impl Iterator<Item = &StateRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<StateRecord> for StateSnapshot {
    fn from_iter<I: IntoIterator<Item = StateRecord>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}

// ---------------------------------------------------------------------------
// Full status
// ---------------------------------------------------------------------------

/// Richer controller status returned by the host's best-effort status query.
///
/// Every field is optional; a host that only knows some of them still
/// produces a usable value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FullStatus {
    pub zones_configured: Option<u32>,
    pub last_calculation: Option<String>,
    pub zones_needing_water: Option<u32>,
    pub is_running: Option<bool>,
    pub next_run: Option<String>,
    pub last_run: Option<String>,
}
