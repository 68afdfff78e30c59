//! Threshold and keyword classifiers.
//!
//! Pure functions mapping a raw reading or string to a closed category.
//! Each category carries the token the renderer uses for styling.

use serde::{Deserialize, Serialize};

/// Soil moisture below this percentage is dry.
pub const MOISTURE_DRY_BELOW: f64 = 30.0;
/// Lower bound of the optimal band.
pub const MOISTURE_OPTIMAL_FROM: f64 = 45.0;
/// Moisture at or above this percentage is wet.
pub const MOISTURE_WET_FROM: f64 = 70.0;

// ---------------------------------------------------------------------------
// Moisture band
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoistureBand {
    Dry,
    Low,
    Optimal,
    Wet,
}

impl MoistureBand {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dry => "dry",
            Self::Low => "low",
            Self::Optimal => "optimal",
            Self::Wet => "wet",
        }
    }
}

/// Band for a moisture percentage.  Each band includes its lower bound.
/// A NaN reading is treated as dry.
pub fn moisture_band(percent: f64) -> MoistureBand {
    if percent >= MOISTURE_WET_FROM {
        MoistureBand::Wet
    } else if percent >= MOISTURE_OPTIMAL_FROM {
        MoistureBand::Optimal
    } else if percent >= MOISTURE_DRY_BELOW {
        MoistureBand::Low
    } else {
        MoistureBand::Dry
    }
}

// ---------------------------------------------------------------------------
// Factor polarity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorPolarity {
    Positive,
    Negative,
}

impl FactorPolarity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

/// A ratio of 1.0 or more increases watering and reads as positive.
pub fn factor_polarity(ratio: f64) -> FactorPolarity {
    if ratio >= 1.0 {
        FactorPolarity::Positive
    } else {
        FactorPolarity::Negative
    }
}

// ---------------------------------------------------------------------------
// Calendar event category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventCategory {
    Completed,
    Skipped,
    RainDelay,
    Scheduled,
}

impl EventCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Skipped => "skipped",
            Self::RainDelay => "rain-delay",
            Self::Scheduled => "scheduled",
        }
    }
}

/// Category of a calendar event from its summary.
///
/// Case-sensitive, first match wins: a finished run must not look
/// scheduled even when its summary also mentions a skip or rain.
pub fn event_category(summary: &str) -> EventCategory {
    if summary.contains("Complete") {
        EventCategory::Completed
    } else if summary.contains("Skip") {
        EventCategory::Skipped
    } else if summary.contains("Rain") {
        EventCategory::RainDelay
    } else {
        EventCategory::Scheduled
    }
}
