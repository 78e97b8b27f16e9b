use thiserror::Error;

/// Robot simulation error types
///
/// Only `ArmDisabled` is raised by the simulator itself; obstacle and
/// safety-floor refusals are reported as `SimEvent`s instead.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Arm not enabled")]
    ArmDisabled,

    #[error("Unknown direction: {0}")]
    UnknownDirection(String),

    #[error("Unknown zig-zag pattern: {0}")]
    UnknownPattern(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SimError {
    /// Short machine-readable tag, used in scenario reports.
    pub fn kind(&self) -> &'static str {
        match self {
            SimError::ArmDisabled => "arm_disabled",
            SimError::UnknownDirection(_) => "unknown_direction",
            SimError::UnknownPattern(_) => "unknown_pattern",
            SimError::Io(_) => "io",
            SimError::Parse(_) => "parse",
        }
    }
}

/// Result type for simulator operations
pub type SimResult<T> = Result<T, SimError>;
