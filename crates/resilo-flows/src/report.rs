use resilo_engine::session::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("assertion failed: {0}")]
    Assertion(String),

    #[error("unknown flow group: {0}")]
    UnknownGroup(String),
}

/// Result of one scenario in a group run.
#[derive(Debug)]
pub struct FlowOutcome {
    pub name: &'static str,
    pub result: Result<(), FlowError>,
}

impl FlowOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), FlowError> {
    if condition {
        Ok(())
    } else {
        Err(FlowError::Assertion(message.into()))
    }
}
