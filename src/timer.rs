//! Periodic refresh timer.
//!
//! Tick-driven: the owner reports elapsed time and the timer says whether
//! a refresh is due.  Arming hands out a [`TimerHandle`]; cancelling
//! consumes it, so a timer can only be released once and never fires
//! afterwards.
//!
//! ```text
//!   arm(30) ──▶ TimerHandle ──┐
//!                             │
//!   tick(1.0) × 29  → false   │
//!   tick(1.0)       → true    │   (elapsed resets)
//!   ...                       │
//!   cancel(handle) ◀──────────┘   → true, then never fires
//! ```

use log::{debug, info};

// ═══════════════════════════════════════════════════════════════
//  Handle
// ═══════════════════════════════════════════════════════════════

/// Ownership token for one arming of a [`RefreshTimer`].
///
/// Not `Clone`: whoever holds it is the only party able to cancel.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping the handle leaves the timer armed with no way to cancel it"]
pub struct TimerHandle {
    id: u32,
}

impl TimerHandle {
    pub fn id(&self) -> u32 {
        self.id
    }
}

// ═══════════════════════════════════════════════════════════════
//  Timer
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
struct Armed {
    id: u32,
    interval_secs: u32,
    elapsed_secs: f32,
}

#[derive(Debug, Default)]
pub struct RefreshTimer {
    armed: Option<Armed>,
    next_id: u32,
}

impl RefreshTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer.  Re-arming replaces the previous arming, whose
    /// handle becomes stale.  A zero interval is treated as one second.
    pub fn arm(&mut self, interval_secs: u32) -> TimerHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let id = self.next_id;
        let interval_secs = interval_secs.max(1);
        if let Some(prev) = self.armed.replace(Armed {
            id,
            interval_secs,
            elapsed_secs: 0.0,
        }) {
            debug!("RefreshTimer: re-armed, handle {} superseded", prev.id);
        }
        info!("RefreshTimer: armed every {interval_secs}s (handle {id})");
        TimerHandle { id }
    }

    /// Release the timer.  Returns `false` when `handle` no longer owns
    /// the timer (already cancelled or superseded by a newer arming).
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.armed {
            Some(armed) if armed.id == handle.id => {
                self.armed = None;
                info!("RefreshTimer: cancelled (handle {})", handle.id);
                true
            }
            _ => false,
        }
    }

    /// Advance by `elapsed_secs`.  Returns `true` when the interval has
    /// passed; fires at most once per call regardless of how much time
    /// elapsed.
    pub fn tick(&mut self, elapsed_secs: f32) -> bool {
        let Some(armed) = self.armed.as_mut() else {
            return false;
        };
        if elapsed_secs.is_finite() && elapsed_secs > 0.0 {
            armed.elapsed_secs += elapsed_secs;
        }
        if armed.elapsed_secs >= armed.interval_secs as f32 {
            armed.elapsed_secs = 0.0;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn interval_secs(&self) -> Option<u32> {
        self.armed.map(|a| a.interval_secs)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
