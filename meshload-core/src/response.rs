//! Response model returned by every endpoint
//!
//! The wire shape is:
//!
//! ```json
//! {
//!   "message": "",
//!   "endpoint": "endpoint1",
//!   "tasks": {
//!     "cpu_task": {
//!       "services": ["service1/endpoint1", "service1/endpoint1"],
//!       "execution_times": [0.5, 0.5]
//!     }
//!   }
//! }
//! ```
//!
//! `services` and `execution_times` are index-aligned: entry `i` of both lists
//! describes the same stressor execution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key of the CPU stressor in [`EndpointResponse::tasks`]
pub const CPU_TASK: &str = "cpu_task";

/// Merged results of one stressor kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Service identity tag of each execution
    #[serde(default)]
    pub services: Vec<String>,

    /// Measured cost of each execution, in seconds
    #[serde(default)]
    pub execution_times: Vec<f32>,
}

impl TaskResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one execution
    pub fn push(&mut self, service: impl Into<String>, execution_time: f32) {
        self.services.push(service.into());
        self.execution_times.push(execution_time);
    }

    /// Append every execution of `other`, keeping both lists aligned
    pub fn extend(&mut self, other: TaskResponse) {
        self.services.extend(other.services);
        self.execution_times.extend(other.execution_times);
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Both lists describe the same executions
    pub fn is_aligned(&self) -> bool {
        self.services.len() == self.execution_times.len()
    }
}

/// Body of every HTTP response served by the emulator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointResponse {
    /// Empty on success, human readable on failure
    #[serde(default)]
    pub message: String,

    /// Matched or attempted endpoint name
    #[serde(default)]
    pub endpoint: String,

    /// Results keyed by stressor kind
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskResponse>,
}

impl EndpointResponse {
    /// Successful response skeleton for `endpoint`
    pub fn for_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Failure response carrying `message`
    pub fn failure(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            endpoint: endpoint.into(),
            tasks: BTreeMap::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: BTreeMap<String, TaskResponse>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn is_success(&self) -> bool {
        self.message.is_empty()
    }

    pub fn cpu_task(&self) -> Option<&TaskResponse> {
        self.tasks.get(CPU_TASK)
    }
}
