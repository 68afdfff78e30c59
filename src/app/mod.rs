//! Application core.
//!
//! Orchestrates the pure view builders: when to fetch, what to keep on
//! failure, when the timer fires.  All interaction with the host happens
//! through the **port traits** in [`ports`], keeping this layer fully
//! testable without a running host.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
