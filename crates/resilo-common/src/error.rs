use crate::dom::ElementId;
use thiserror::Error;

/// Errors raised by a browser-control backend.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("failed to connect to browser endpoint: {0}")]
    Connect(String),

    #[error("browser protocol error: {0}")]
    Protocol(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("operation not supported by this backend: {0}")]
    NotSupported(String),

    /// The backend no longer holds a live node for this ID. Handles die
    /// with the page render that produced them.
    #[error("no live element with id {0} in the current page")]
    UnknownElement(ElementId),
}

/// A previously resolved handle was used after the page it came from
/// was replaced by a navigation or reload.
#[derive(Debug, Clone, Error)]
#[error(
    "stale element: '{target}' was resolved against page generation {resolved_epoch}, \
     current generation is {current_epoch}; re-resolve after navigation"
)]
pub struct StaleElement {
    pub target: String,
    pub resolved_epoch: u64,
    pub current_epoch: u64,
}

/// Failure of the diagnostics sink. Logged by callers, never escalated.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("could not store diagnostic artifact: {0}")]
    Store(#[from] std::io::Error),

    #[error("diagnostic capture rejected: {0}")]
    Rejected(String),
}
