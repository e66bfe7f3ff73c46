//! Stressor execution configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};

/// Stressor execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Upper bound on `threads` of any single cost profile
    #[serde(default = "default_max_threads_per_task")]
    pub max_threads_per_task: u32,

    /// Hold a thread pin for the duration of each stress measurement.
    ///
    /// Costs are always read from the calling thread's own CPU clock, so
    /// turning this off does not change measured execution times. It only
    /// skips the pin guard, which is observable through
    /// `meshload_execution::is_pinned`.
    #[serde(default = "crate::domains::utils::default_true")]
    pub isolate_threads: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_threads_per_task: default_max_threads_per_task(),
            isolate_threads: true,
        }
    }
}

impl Validatable for ExecutionConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(
            self.max_threads_per_task,
            "max_threads_per_task",
            self.domain_name(),
        )
    }

    fn domain_name(&self) -> &'static str {
        "execution"
    }
}

fn default_max_threads_per_task() -> u32 {
    256
}
