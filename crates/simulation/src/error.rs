// ---------------------------------------------------------------------------
// SimulationError: typed failures for snapshot generation and configuration
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors returned by snapshot generation and district configuration.
///
/// Both variants are local, synchronous failures: a call either produces a
/// complete snapshot or returns one of these before producing anything.
#[derive(Debug)]
pub enum SimulationError {
    /// A caller-supplied value is out of range (hour outside 0..=23, bad grid size).
    InvalidInput(String),
    /// District definitions are malformed or overlap.
    Configuration(String),
}

impl SimulationError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SimulationError::InvalidInput(_))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, SimulationError::Configuration(_))
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            SimulationError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for SimulationError {}

impl From<serde_json::Error> for SimulationError {
    fn from(e: serde_json::Error) -> Self {
        SimulationError::Configuration(format!("district config is not valid JSON: {e}"))
    }
}

pub type SimResult<T> = Result<T, SimulationError>;

/// Reject hours outside `0..=23`.
pub fn validate_hour(hour: u32) -> SimResult<u32> {
    if hour < crate::config::HOURS_PER_DAY {
        Ok(hour)
    } else {
        Err(SimulationError::InvalidInput(format!(
            "hour must be in 0..=23, got {hour}"
        )))
    }
}
