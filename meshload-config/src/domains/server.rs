//! HTTP server configuration

use crate::error::{ConfigError, ConfigResult};
use crate::validation::{validate_port_range, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Emit a tracing span per HTTP request
    #[serde(default = "crate::domains::utils::default_true")]
    pub enable_tracing: bool,

    /// Attach an `X-Request-ID` header to every response
    #[serde(default = "crate::domains::utils::default_true")]
    pub enable_request_id: bool,

    /// Capacity of the channel feeding endpoint definitions to the registry
    #[serde(default = "default_feed_buffer")]
    pub feed_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            enable_tracing: true,
            enable_request_id: true,
            feed_buffer: default_feed_buffer(),
        }
    }
}

impl ServerConfig {
    /// Resolve the address the listener binds to
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| ConfigError::DomainError {
                domain: self.domain_name().to_string(),
                message: format!(
                    "invalid bind address '{}:{}': {}",
                    self.bind_address, self.port, e
                ),
            })
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.bind_address, "bind_address", self.domain_name())?;
        validate_port_range(self.port, "port", self.domain_name())?;

        if self.feed_buffer == 0 {
            return Err(self.validation_error("feed_buffer must be greater than 0"));
        }

        self.socket_addr()?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server"
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_feed_buffer() -> usize {
    64
}
