//! Domain-specific configuration modules

pub mod endpoints;
pub mod execution;
pub mod logging;
pub mod server;
pub mod service;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main meshload configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MeshloadConfig {
    /// Identity of the emulated service
    #[serde(default)]
    pub service: service::ServiceConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: server::ServerConfig,

    /// Stressor execution configuration
    #[serde(default)]
    pub execution: execution::ExecutionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Endpoints served by this node
    #[serde(default)]
    pub endpoints: endpoints::EndpointsConfig,
}

impl MeshloadConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.service.validate()?;
        self.server.validate()?;
        self.execution.validate()?;
        self.logging.validate()?;
        self.endpoints.validate()?;

        // Cross-domain limits
        self.endpoints
            .check_thread_limit(self.execution.max_threads_per_task)?;

        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let mut config = MeshloadConfig::default();
        config.endpoints = endpoints::EndpointsConfig::sample();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MeshloadConfig::default().validate_all().is_ok());
    }

    #[test]
    fn test_sample_round_trips() {
        let sample = MeshloadConfig::generate_sample();
        let parsed: MeshloadConfig = serde_yaml::from_str(&sample).unwrap();

        assert!(parsed.validate_all().is_ok());
        assert_eq!(parsed.endpoints.len(), 2);
    }

    #[test]
    fn test_thread_limit_is_enforced_across_domains() {
        let yaml = r#"
execution:
  max_threads_per_task: 4
endpoints:
  - name: wide
    execution_mode: parallel
    cpu_complexity:
      execution_time: 0.1
      threads: 8
"#;
        let config: MeshloadConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate_all().is_err());
    }
}
