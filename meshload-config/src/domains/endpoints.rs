//! Endpoint list configuration

use std::collections::HashSet;

use meshload_core::{EndpointDefinition, ExecutionMode};
use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::Validatable;

/// Endpoints served by one node, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointsConfig(pub Vec<EndpointDefinition>);

impl EndpointsConfig {
    pub fn new(endpoints: Vec<EndpointDefinition>) -> Self {
        Self(endpoints)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EndpointDefinition> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject profiles fanning out wider than `max_threads`
    pub fn check_thread_limit(&self, max_threads: u32) -> ConfigResult<()> {
        for endpoint in self.iter() {
            if let Some(cpu) = &endpoint.cpu_complexity {
                if cpu.threads > max_threads {
                    return Err(self.validation_error(format!(
                        "endpoint '{}' declares {} cpu threads, limit is {}",
                        endpoint.name, cpu.threads, max_threads
                    )));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn sample() -> Self {
        Self(vec![
            EndpointDefinition::new("endpoint1").with_cpu_complexity(0.5, 1),
            EndpointDefinition::new("endpoint2")
                .with_execution_mode(ExecutionMode::Parallel)
                .with_cpu_complexity(0.25, 4),
        ])
    }
}

impl Validatable for EndpointsConfig {
    fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();

        for endpoint in self.iter() {
            endpoint.validate()?;

            if !seen.insert(endpoint.name.as_str()) {
                return Err(self.validation_error(format!(
                    "duplicate endpoint name '{}'",
                    endpoint.name
                )));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "endpoints"
    }
}

impl IntoIterator for EndpointsConfig {
    type Item = EndpointDefinition;
    type IntoIter = std::vec::IntoIter<EndpointDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
