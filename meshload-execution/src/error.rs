//! Error types for stressor execution

use thiserror::Error;

/// Stressor execution errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("Invalid cost profile: {0}")]
    InvalidProfile(String),

    #[error("Thread CPU clock unavailable: {0}")]
    ClockUnavailable(String),

    #[error("Failed to spawn {kind} stressor thread: {reason}")]
    SpawnFailed { kind: String, reason: String },

    #[error("{kind} stressor panicked: {message}")]
    StressorPanicked { kind: String, message: String },

    #[error("{failed} of {total} {kind} executions failed: {first}")]
    FanOutFailed {
        kind: String,
        failed: usize,
        total: usize,
        first: Box<ExecutionError>,
    },
}

/// Result type for stressor execution
pub type ExecutionResult<T> = Result<T, ExecutionError>;
