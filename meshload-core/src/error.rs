//! Core error types for meshload

use thiserror::Error;

/// Core error type raised while building or checking domain values
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// The endpoint name cannot be used as a single URL path segment
    #[error("Invalid endpoint name '{name}': {reason}")]
    InvalidEndpointName { name: String, reason: String },

    /// A cost profile declares values outside the allowed range
    #[error("Invalid cost profile for endpoint '{endpoint}': {reason}")]
    InvalidCostProfile { endpoint: String, reason: String },

    /// Unknown execution mode string
    #[error("Invalid execution mode: '{0}'. Supported modes are: sequential, parallel")]
    InvalidExecutionMode(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
