//! Outbound panel events.
//!
//! The [`PanelService`](super::service::PanelService) emits these through
//! the [`ViewSink`](super::ports::ViewSink) port.  Adapters on the other
//! side decide what to do with them: log them, invalidate a rendered
//! view, forward them to a UI thread.

use crate::calendar::MonthRef;
use crate::error::PortError;
use crate::view_model::ControllerStatus;

/// Structured events emitted by the panel core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// The refresh timer was armed.
    Started { interval_secs: u32 },

    /// The refresh timer was released.
    Stopped,

    /// The service dropped its views and will ignore further calls.
    Disposed,

    /// A new dashboard replaced the previous one.
    DashboardRefreshed {
        status: ControllerStatus,
        zones: usize,
        refresh_count: u64,
    },

    /// The snapshot fetch failed; the previous dashboard stays.
    RefreshFailed(PortError),

    /// A calendar grid was (re)built and binned.
    CalendarUpdated { month: MonthRef, events: usize },

    /// The event fetch for `month` failed.
    CalendarFetchFailed { month: MonthRef, error: PortError },

    /// The host accepted an action.
    ActionInvoked { service: &'static str },

    /// The host refused or failed an action.
    ActionFailed {
        service: &'static str,
        error: PortError,
    },
}
