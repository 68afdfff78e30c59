//! Irrigation panel core.
//!
//! Turns a snapshot of host state records into a dashboard view model,
//! and a reference month plus calendar events into a 42-cell month grid
//! with events binned by day.  Rendering and the host services that
//! mutate irrigation state live outside this crate, behind the port
//! traits in [`app::ports`].
//!
//! ```text
//!  StateSnapshot ──▶ indexer ──▶ view_model ──▶ DashboardView
//!  MonthRef ───────▶ calendar ─▶ binner ─────▶ CalendarGrid
//!                                   ▲
//!  CalendarEvent[] ─────────────────┘
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod binner;
pub mod calendar;
pub mod classify;
pub mod config;
pub mod error;
pub mod indexer;
pub mod runner;
pub mod state;
pub mod timer;
pub mod view_model;

pub use app::service::PanelService;
pub use config::PanelConfig;
pub use error::{Error, PortError, Result};
