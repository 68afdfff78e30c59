//! Adapters, the concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements             | Connects to                 |
//! |------------|------------------------|-----------------------------|
//! | `clock`    | ClockPort              | `chrono::Local` / fixed date|
//! | `log_sink` | ViewSink               | `log` facade                |
//! | `memory`   | StatePort              | In-memory snapshot          |
//! |            | CalendarPort           | In-memory event lists       |
//! |            | ActionPort             | Recorded action log         |

pub mod clock;
pub mod log_sink;
pub mod memory;
