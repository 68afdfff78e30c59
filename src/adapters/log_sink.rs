//! Log-based view sink adapter.
//!
//! Implements [`ViewSink`] by writing each panel event as one log line
//! through the `log` facade.  A renderer adapter would implement the same
//! trait to invalidate its views instead.

use log::{info, warn};

use crate::app::events::PanelEvent;
use crate::app::ports::ViewSink;

/// Adapter that logs every [`PanelEvent`].
#[derive(Debug, Default)]
pub struct LogViewSink;

impl LogViewSink {
    pub fn new() -> Self {
        Self
    }
}

impl ViewSink for LogViewSink {
    fn emit(&mut self, event: &PanelEvent) {
        match event {
            PanelEvent::Started { interval_secs } => {
                info!("START | refresh every {}s", interval_secs);
            }
            PanelEvent::Stopped => info!("STOP  | refresh timer released"),
            PanelEvent::Disposed => info!("DISPOSE | views dropped"),
            PanelEvent::DashboardRefreshed {
                status,
                zones,
                refresh_count,
            } => {
                info!(
                    "DASH  | #{} status={} zones={}",
                    refresh_count,
                    status.as_str(),
                    zones
                );
            }
            PanelEvent::RefreshFailed(e) => warn!("DASH  | refresh failed: {}", e),
            PanelEvent::CalendarUpdated { month, events } => {
                info!("CAL   | {} events={}", month, events);
            }
            PanelEvent::CalendarFetchFailed { month, error } => {
                warn!("CAL   | {} fetch failed: {}", month, error);
            }
            PanelEvent::ActionInvoked { service } => info!("ACT   | {} sent", service),
            PanelEvent::ActionFailed { service, error } => {
                warn!("ACT   | {} failed: {}", service, error);
            }
        }
    }
}
