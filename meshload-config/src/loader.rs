//! Configuration loading and environment variable handling

use crate::domains::MeshloadConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "MESHLOAD".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML or JSON file with environment overrides
    ///
    /// Files with a `.json` extension are parsed as JSON, everything else as YAML.
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<MeshloadConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        self.finish(config)
    }

    /// Load configuration from an in-memory YAML document
    pub fn from_yaml_str(&self, content: &str) -> ConfigResult<MeshloadConfig> {
        let config = serde_yaml::from_str(content)?;
        self.finish(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<MeshloadConfig> {
        self.finish(MeshloadConfig::default())
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<MeshloadConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    fn finish(&self, mut config: MeshloadConfig) -> ConfigResult<MeshloadConfig> {
        // Apply environment variable overrides
        self.apply_env_overrides(&mut config)?;

        // Validate all domains
        config.validate_all()?;

        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut MeshloadConfig) -> ConfigResult<()> {
        self.apply_service_overrides(&mut config.service)?;
        self.apply_server_overrides(&mut config.server)?;
        self.apply_execution_overrides(&mut config.execution)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    /// Apply service identity overrides
    fn apply_service_overrides(
        &self,
        config: &mut crate::domains::service::ServiceConfig,
    ) -> ConfigResult<()> {
        if let Ok(name) = self.get_env_var("SERVICE_NAME") {
            config.name = name;
        }

        Ok(())
    }

    /// Apply server config overrides
    fn apply_server_overrides(
        &self,
        config: &mut crate::domains::server::ServerConfig,
    ) -> ConfigResult<()> {
        if let Ok(bind) = self.get_env_var("SERVER_BIND_ADDRESS") {
            config.bind_address = bind;
        }

        if let Ok(port) = self.get_env_var("SERVER_PORT") {
            config.port = port
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid SERVER_PORT: {}", e)))?;
        }

        Ok(())
    }

    /// Apply execution config overrides
    fn apply_execution_overrides(
        &self,
        config: &mut crate::domains::execution::ExecutionConfig,
    ) -> ConfigResult<()> {
        if let Ok(max_threads) = self.get_env_var("MAX_THREADS_PER_TASK") {
            config.max_threads_per_task = max_threads.parse().map_err(|e| {
                ConfigError::EnvError(format!("Invalid MAX_THREADS_PER_TASK: {}", e))
            })?;
        }

        if let Ok(isolate) = self.get_env_var("ISOLATE_THREADS") {
            config.isolate_threads = isolate
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid ISOLATE_THREADS: {}", e)))?;
        }

        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
