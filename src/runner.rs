//! Async refresh loop for hosts that prefer a real clock over ticking.
//!
//! Uses `async-io-mini` reactor timers (no busy-spinning) raced against
//! an `embassy-sync` stop signal, driven by an `edge-executor`
//! executor.
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────┐
//!  │  futures_lite::block_on                              │
//!  │  ┌────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                  │  │
//!  │  │                                                │  │
//!  │  │   refresh ──▶ ┌─ Timer(interval) ─┐ ──▶ refresh │  │
//!  │  │               └─ stop.wait()  ────┘ ──▶ exit   │  │
//!  │  └────────────────────────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────┘
//! ```
//!
//! The loop exits on the stop signal, or as soon as the service is
//! stopped or disposed.

use core::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::info;

use crate::app::ports::{StatePort, ViewSink};
use crate::app::service::PanelService;
use crate::error::Error;

/// Signal that ends a running refresh loop.  Safe to raise from another
/// thread.
pub type StopSignal = Signal<CriticalSectionRawMutex, ()>;

/// Refresh immediately, then every configured interval until stopped.
///
/// Returns the number of successful refreshes.
pub async fn run_refresh_loop(
    service: &mut PanelService,
    host: &mut impl StatePort,
    sink: &mut impl ViewSink,
    stop: &StopSignal,
) -> u64 {
    let interval = Duration::from_secs(u64::from(service.config().refresh_interval_secs));
    let mut refreshed = 0u64;

    info!("Refresh loop started ({}s interval)", interval.as_secs());
    loop {
        if stop.signaled() || !service.is_active() {
            break;
        }

        match service.refresh(host, sink) {
            Ok(()) => refreshed += 1,
            Err(Error::Disposed) => break,
            // Already recorded in the error flag and emitted.
            Err(_) => {}
        }

        let tick = async {
            async_io_mini::Timer::after(interval).await;
            true
        };
        let stopped = async {
            stop.wait().await;
            false
        };
        if !futures_lite::future::or(stopped, tick).await {
            break;
        }
    }
    info!("Refresh loop exited after {refreshed} refreshes");
    refreshed
}

/// Drive [`run_refresh_loop`] to completion on the current thread.
pub fn run_blocking(
    service: &mut PanelService,
    host: &mut impl StatePort,
    sink: &mut impl ViewSink,
    stop: &StopSignal,
) -> u64 {
    let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();
    futures_lite::future::block_on(executor.run(run_refresh_loop(service, host, sink, stop)))
}
