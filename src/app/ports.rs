//! Port traits at the hexagonal boundary between the panel core and the host.
//!
//! ```text
//!   Host adapter ──▶ Port trait ──▶ PanelService (domain)
//! ```
//!
//! The host platform owns the state store, the calendar and the services
//! that mutate irrigation state.  Adapters implement these traits; the
//! [`PanelService`](super::service::PanelService) consumes them via
//! generics, so the core never talks to the host directly.
//!
//! All calls are synchronous from the core's point of view.  A host with
//! an async transport resolves the request before returning.

use chrono::{NaiveDate, NaiveDateTime};

use crate::binner::CalendarEvent;
use crate::error::PortError;
use crate::state::{FullStatus, StateSnapshot};

use super::commands::Action;
use super::events::PanelEvent;

// ───────────────────────────────────────────────────────────────
// State port (driven adapter: host state store → domain)
// ───────────────────────────────────────────────────────────────

pub trait StatePort {
    /// Read every known record.  The result may be partial or stale.
    fn state_snapshot(&mut self) -> Result<StateSnapshot, PortError>;

    /// Best-effort richer status.  `None` covers both "not supported"
    /// and "failed"; the core never surfaces it as an error.
    fn full_status(&mut self) -> Option<FullStatus>;
}

// ───────────────────────────────────────────────────────────────
// Calendar port (driven adapter: host calendar → domain)
// ───────────────────────────────────────────────────────────────

pub trait CalendarPort {
    /// Events of `entity` starting within `[start, end)`, host-local time.
    fn calendar_events(
        &mut self,
        entity: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEvent>, PortError>;
}

// ───────────────────────────────────────────────────────────────
// Action port (driven adapter: domain → host services)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget host service calls.  `Ok` means the host accepted
/// the request, not that the effect happened.
pub trait ActionPort {
    fn invoke(&mut self, action: &Action) -> Result<(), PortError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Source of "today" for the calendar grid.
pub trait ClockPort {
    fn today(&self) -> NaiveDate;
}

// ───────────────────────────────────────────────────────────────
// View sink (driven adapter: domain → renderer / logging)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`PanelEvent`]s through this port.
/// Adapters decide where they go (log, renderer invalidation, etc.).
pub trait ViewSink {
    fn emit(&mut self, event: &PanelEvent);
}
