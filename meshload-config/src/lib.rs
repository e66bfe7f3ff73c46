//! Domain-driven configuration management for meshload
//!
//! This crate provides modular configuration split by functional domains,
//! with validation, defaults, and environment variable support. The endpoint
//! list of a node is part of the same document so that a malformed definition
//! is rejected before the server starts serving.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    endpoints::EndpointsConfig, execution::ExecutionConfig, logging::LoggingConfig,
    server::ServerConfig, service::ServiceConfig, MeshloadConfig,
};
