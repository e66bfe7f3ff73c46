//! Core type definitions for meshload

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// How the stressors of one endpoint are scheduled relative to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Stressor kinds run one after another on the calling thread
    #[default]
    Sequential,
    /// Stressor kinds run concurrently, each fanning out over its threads
    Parallel,
}

impl ExecutionMode {
    /// Get the string representation of the execution mode
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(ExecutionMode::Sequential),
            "parallel" => Ok(ExecutionMode::Parallel),
            _ => Err(CoreError::InvalidExecutionMode(s.to_string())),
        }
    }
}

/// Check that `name` can be served as exactly one URL path segment.
///
/// Only unreserved URI characters are accepted (`A-Z a-z 0-9 - . _ ~`), and the
/// dot segments `.` and `..` are refused since routers normalise them away.
pub fn validate_path_segment(name: &str) -> Result<()> {
    let invalid = |reason: &str| CoreError::InvalidEndpointName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }

    if name == "." || name == ".." {
        return Err(invalid("dot segments are not routable"));
    }

    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')))
    {
        return Err(invalid(&format!("character {:?} is not allowed in a path segment", c)));
    }

    Ok(())
}
