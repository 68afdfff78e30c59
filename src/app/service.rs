//! Panel service, the hexagonal core.
//!
//! [`PanelService`] owns the derived views (dashboard and calendar grid),
//! the refresh timer and the error flags.  All host interaction flows
//! through port traits injected at call sites, so the whole service is
//! testable with mock adapters.
//!
//! ```text
//!   StatePort ──▶ ┌─────────────────────────────┐ ──▶ ViewSink
//! CalendarPort ──▶│        PanelService         │
//!  ActionPort ◀───│ dashboard · calendar · timer│
//!   ClockPort ──▶ └─────────────────────────────┘
//! ```
//!
//! Every fetch replaces the previous view wholesale.  A failed fetch
//! keeps the previous view and raises an error flag instead.

use log::{info, warn};

use crate::binner::bin_events;
use crate::calendar::{CalendarGrid, MonthRef, build_month_grid};
use crate::config::PanelConfig;
use crate::error::{Error, PortError, Result};
use crate::indexer::{DomainFilter, index_snapshot};
use crate::timer::{RefreshTimer, TimerHandle};
use crate::view_model::{DashboardView, build_dashboard};

use super::commands::Action;
use super::events::PanelEvent;
use super::ports::{ActionPort, CalendarPort, ClockPort, StatePort, ViewSink};

// ───────────────────────────────────────────────────────────────
// PanelService
// ───────────────────────────────────────────────────────────────

pub struct PanelService {
    config: PanelConfig,
    filter: DomainFilter,
    timer: RefreshTimer,
    /// Present exactly while the service is started.
    timer_handle: Option<TimerHandle>,
    dashboard: DashboardView,
    dashboard_error: Option<PortError>,
    calendar: Option<CalendarGrid>,
    calendar_error: Option<PortError>,
    refresh_count: u64,
    disposed: bool,
}

impl PanelService {
    /// Construct the service from a validated configuration.
    ///
    /// Does **not** arm the refresh timer; call [`start`](Self::start).
    pub fn new(config: PanelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            filter: DomainFilter::from_config(&config),
            config,
            timer: RefreshTimer::new(),
            timer_handle: None,
            dashboard: DashboardView::default(),
            dashboard_error: None,
            calendar: None,
            calendar_error: None,
            refresh_count: 0,
            disposed: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Arm the periodic refresh.  Starting an active service is a no-op.
    pub fn start(&mut self, sink: &mut impl ViewSink) -> Result<()> {
        self.ensure_live()?;
        if self.timer_handle.is_some() {
            return Ok(());
        }
        let interval_secs = self.config.refresh_interval_secs;
        self.timer_handle = Some(self.timer.arm(interval_secs));
        sink.emit(&PanelEvent::Started { interval_secs });
        info!("PanelService started, refreshing every {interval_secs}s");
        Ok(())
    }

    /// Release the refresh timer.  Returns `false` if it was not armed.
    pub fn stop(&mut self, sink: &mut impl ViewSink) -> bool {
        let Some(handle) = self.timer_handle.take() else {
            return false;
        };
        let released = self.timer.cancel(handle);
        sink.emit(&PanelEvent::Stopped);
        info!("PanelService stopped");
        released
    }

    /// Stop, drop every derived view and refuse further work.
    pub fn dispose(&mut self, sink: &mut impl ViewSink) {
        if self.disposed {
            return;
        }
        self.stop(sink);
        self.dashboard = DashboardView::default();
        self.dashboard_error = None;
        self.calendar = None;
        self.calendar_error = None;
        self.disposed = true;
        sink.emit(&PanelEvent::Disposed);
        info!("PanelService disposed after {} refreshes", self.refresh_count);
    }

    // ── Dashboard ─────────────────────────────────────────────

    /// Fetch a snapshot and rebuild the dashboard.
    ///
    /// On failure the previous dashboard stays and
    /// [`dashboard_error`](Self::dashboard_error) is set.
    pub fn refresh(&mut self, host: &mut impl StatePort, sink: &mut impl ViewSink) -> Result<()> {
        self.ensure_live()?;

        let snapshot = match host.state_snapshot() {
            Ok(s) => s,
            Err(e) => {
                warn!("Snapshot fetch failed: {e}; keeping previous dashboard");
                self.dashboard_error = Some(e);
                sink.emit(&PanelEvent::RefreshFailed(e));
                return Err(e.into());
            }
        };
        let full = host.full_status();

        let indexed = index_snapshot(&snapshot, &self.filter);
        self.dashboard = build_dashboard(&indexed, full.as_ref());
        self.dashboard_error = None;
        self.refresh_count += 1;

        sink.emit(&PanelEvent::DashboardRefreshed {
            status: self.dashboard.status,
            zones: self.dashboard.zones.len(),
            refresh_count: self.refresh_count,
        });
        Ok(())
    }

    /// Advance the refresh timer; refreshes when it fires.
    ///
    /// Returns `true` when a refresh was attempted.  Refresh failures are
    /// already recorded in the error flag and the sink, so they are not
    /// returned here.
    pub fn tick(
        &mut self,
        elapsed_secs: f32,
        host: &mut impl StatePort,
        sink: &mut impl ViewSink,
    ) -> bool {
        if self.disposed || !self.timer.tick(elapsed_secs) {
            return false;
        }
        let _ = self.refresh(host, sink);
        true
    }

    // ── Calendar ──────────────────────────────────────────────

    /// Show `month`: build its grid, fetch the visible range and bin.
    ///
    /// When the fetch fails for the month already on screen, the old grid
    /// stays.  For a newly selected month the empty grid is shown.  Either
    /// way [`calendar_error`](Self::calendar_error) is set.
    pub fn set_month(
        &mut self,
        month: MonthRef,
        host: &mut impl CalendarPort,
        clock: &impl ClockPort,
        sink: &mut impl ViewSink,
    ) -> Result<()> {
        self.ensure_live()?;

        let previous = self.month();
        if previous != Some(month) {
            info!("Calendar month {month}");
        }

        let grid = build_month_grid(month, clock.today());
        let (start, end) = grid.fetch_range();

        match host.calendar_events(&self.config.calendar_entity, start, end) {
            Ok(events) => {
                let binned = bin_events(
                    &grid,
                    &events,
                    self.config.max_events_per_day,
                    self.config.summary_max_chars,
                );
                sink.emit(&PanelEvent::CalendarUpdated {
                    month,
                    events: binned.event_count(),
                });
                self.calendar = Some(binned);
                self.calendar_error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Calendar fetch for {month} failed: {e}");
                if previous != Some(month) {
                    self.calendar = Some(grid);
                }
                self.calendar_error = Some(e);
                sink.emit(&PanelEvent::CalendarFetchFailed { month, error: e });
                Err(e.into())
            }
        }
    }

    /// Show the month containing today.
    pub fn current_month(
        &mut self,
        host: &mut impl CalendarPort,
        clock: &impl ClockPort,
        sink: &mut impl ViewSink,
    ) -> Result<()> {
        self.set_month(MonthRef::containing(clock.today()), host, clock, sink)
    }

    pub fn previous_month(
        &mut self,
        host: &mut impl CalendarPort,
        clock: &impl ClockPort,
        sink: &mut impl ViewSink,
    ) -> Result<()> {
        let target = self.month_or_current(clock).previous();
        self.set_month(target, host, clock, sink)
    }

    pub fn next_month(
        &mut self,
        host: &mut impl CalendarPort,
        clock: &impl ClockPort,
        sink: &mut impl ViewSink,
    ) -> Result<()> {
        let target = self.month_or_current(clock).next();
        self.set_month(target, host, clock, sink)
    }

    // ── Actions ───────────────────────────────────────────────

    /// Fire `action` at the host, then refresh regardless of the outcome.
    ///
    /// The action error (if any) takes precedence over a refresh error.
    pub fn invoke_action(
        &mut self,
        action: Action,
        host: &mut (impl ActionPort + StatePort),
        sink: &mut impl ViewSink,
    ) -> Result<()> {
        self.ensure_live()?;

        let action = self.resolve_defaults(action);
        let service = action.service_name();
        let outcome = host.invoke(&action);
        match outcome {
            Ok(()) => {
                info!("Action {} sent {}", action.qualified_service(), action.params());
                sink.emit(&PanelEvent::ActionInvoked { service });
            }
            Err(e) => {
                warn!("Action {service} failed: {e}");
                sink.emit(&PanelEvent::ActionFailed { service, error: e });
            }
        }

        let refreshed = self.refresh(host, sink);
        outcome?;
        refreshed
    }

    /// Fill in the durations the caller left open.
    fn resolve_defaults(&self, action: Action) -> Action {
        match action {
            Action::RunZone {
                zone_id,
                duration_minutes: None,
            } => {
                let duration = self.recommended_minutes(&zone_id);
                Action::RunZone {
                    zone_id,
                    duration_minutes: Some(duration.unwrap_or(self.config.default_run_minutes)),
                }
            }
            Action::RainDelay { hours: None } => Action::RainDelay {
                hours: Some(self.config.rain_delay_hours),
            },
            other => other,
        }
    }

    /// Positive recommended duration of a zone, rounded up to whole minutes.
    fn recommended_minutes(&self, zone_id: &str) -> Option<u32> {
        let minutes = self
            .dashboard
            .zones
            .iter()
            .find(|z| z.id == zone_id)?
            .recommendation
            .as_ref()?
            .duration_minutes;
        (minutes.is_finite() && minutes > 0.0).then(|| minutes.ceil().min(f64::from(u32::MAX)) as u32)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn dashboard(&self) -> &DashboardView {
        &self.dashboard
    }

    pub fn calendar(&self) -> Option<&CalendarGrid> {
        self.calendar.as_ref()
    }

    /// Month currently on screen.
    pub fn month(&self) -> Option<MonthRef> {
        self.calendar.as_ref().map(CalendarGrid::month)
    }

    /// Last snapshot failure, cleared by the next successful refresh.
    pub fn dashboard_error(&self) -> Option<PortError> {
        self.dashboard_error
    }

    /// Last calendar failure, cleared by the next successful fetch.
    pub fn calendar_error(&self) -> Option<PortError> {
        self.calendar_error
    }

    /// Whether the refresh timer is armed.
    pub fn is_active(&self) -> bool {
        self.timer_handle.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Successful refreshes since construction.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            Err(Error::Disposed)
        } else {
            Ok(())
        }
    }

    fn month_or_current(&self, clock: &impl ClockPort) -> MonthRef {
        self.month()
            .unwrap_or_else(|| MonthRef::containing(clock.today()))
    }
}
