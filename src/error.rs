//! Error types for the irrigation panel core.
//!
//! Aggregation and classification are total and never produce these.
//! Only the collaborator boundary (snapshot, calendar, action calls) and
//! the service lifecycle can fail, and both funnel into [`Error`].

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A collaborator call failed.
    Port(PortError),
    /// The service was disposed and can no longer be started.
    Disposed,
    /// Configuration failed validation.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Port(e) => write!(f, "port: {e}"),
            Self::Disposed => write!(f, "service disposed"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Collaborator errors
// ---------------------------------------------------------------------------

/// Failure reported by the external host platform.
///
/// The core never retries; it logs the failure, keeps the previously
/// computed view, and raises an error flag for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    /// The host could not be reached or is not ready.
    Unavailable,
    /// The request did not complete in time.
    Timeout,
    /// The host refused the request.
    Rejected,
    /// The host answered with a payload that could not be decoded.
    Malformed,
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "host unavailable"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Rejected => write!(f, "request rejected"),
            Self::Malformed => write!(f, "malformed response"),
        }
    }
}

impl std::error::Error for PortError {}

impl From<PortError> for Error {
    fn from(e: PortError) -> Self {
        Self::Port(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
