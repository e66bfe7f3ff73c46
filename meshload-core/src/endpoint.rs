//! Endpoint definitions
//!
//! An [`EndpointDefinition`] describes one emulated capability: the path segment
//! it is served under, how its stressors are scheduled, and the cost profile of
//! every stressor kind it declares. Definitions are built once from
//! configuration and are read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::{validate_path_segment, ExecutionMode};

/// CPU cost profile of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuComplexity {
    /// Thread CPU time each execution must consume, in seconds
    pub execution_time: f32,

    /// Number of concurrent executions of the stressor
    #[serde(default = "default_threads")]
    pub threads: u32,
}

impl CpuComplexity {
    pub fn new(execution_time: f32, threads: u32) -> Self {
        Self {
            execution_time,
            threads,
        }
    }
}

fn default_threads() -> u32 {
    1
}

/// Immutable description of one emulated endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDefinition {
    /// Unique name, also the routable path segment
    pub name: String,

    #[serde(default)]
    pub execution_mode: ExecutionMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_complexity: Option<CpuComplexity>,
}

impl EndpointDefinition {
    /// Create an endpoint without any cost profile
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            execution_mode: ExecutionMode::default(),
            cpu_complexity: None,
        }
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    pub fn with_cpu_complexity(mut self, execution_time: f32, threads: u32) -> Self {
        self.cpu_complexity = Some(CpuComplexity::new(execution_time, threads));
        self
    }

    /// URL path the endpoint is served under
    pub fn path(&self) -> String {
        format!("/{}", self.name)
    }

    /// Whether any stressor profile is declared at all
    pub fn has_cost_profile(&self) -> bool {
        self.cpu_complexity.is_some()
    }

    /// Validate the name and every declared cost profile
    pub fn validate(&self) -> Result<()> {
        validate_path_segment(&self.name)?;

        if let Some(cpu) = &self.cpu_complexity {
            let invalid = |reason: String| CoreError::InvalidCostProfile {
                endpoint: self.name.clone(),
                reason,
            };

            if !cpu.execution_time.is_finite() {
                return Err(invalid(format!(
                    "cpu execution_time must be finite, got {}",
                    cpu.execution_time
                )));
            }
            if cpu.execution_time < 0.0 {
                return Err(invalid(format!(
                    "cpu execution_time must not be negative, got {}",
                    cpu.execution_time
                )));
            }
            if cpu.threads < 1 {
                return Err(invalid("cpu threads must be at least 1".to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_yaml() {
        let yaml = r#"
name: endpoint1
execution_mode: parallel
cpu_complexity:
  execution_time: 0.25
  threads: 4
"#;
        let endpoint: EndpointDefinition = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(endpoint.name, "endpoint1");
        assert_eq!(endpoint.execution_mode, ExecutionMode::Parallel);
        assert_eq!(endpoint.cpu_complexity, Some(CpuComplexity::new(0.25, 4)));
        assert_eq!(endpoint.path(), "/endpoint1");
        assert!(endpoint.validate().is_ok());
    }

    #[test]
    fn test_endpoint_defaults() {
        let endpoint: EndpointDefinition =
            serde_json::from_str(r#"{"name":"plain","cpu_complexity":{"execution_time":1.0}}"#)
                .unwrap();

        assert_eq!(endpoint.execution_mode, ExecutionMode::Sequential);
        assert_eq!(endpoint.cpu_complexity.unwrap().threads, 1);

        let bare = EndpointDefinition::new("bare");
        assert!(!bare.has_cost_profile());
        assert!(bare.validate().is_ok());
    }

    #[test]
    fn test_cost_profile_validation() {
        let negative = EndpointDefinition::new("neg").with_cpu_complexity(-0.5, 1);
        assert!(matches!(
            negative.validate(),
            Err(CoreError::InvalidCostProfile { .. })
        ));

        let no_threads = EndpointDefinition::new("zero").with_cpu_complexity(0.5, 0);
        assert!(no_threads.validate().is_err());

        let nan = EndpointDefinition::new("nan").with_cpu_complexity(f32::NAN, 1);
        assert!(nan.validate().is_err());

        let zero_time = EndpointDefinition::new("zero-time").with_cpu_complexity(0.0, 2);
        assert!(zero_time.validate().is_ok());
    }

    #[test]
    fn test_invalid_name_rejected() {
        let endpoint = EndpointDefinition::new("a/b");
        assert!(matches!(
            endpoint.validate(),
            Err(CoreError::InvalidEndpointName { .. })
        ));
    }
}
