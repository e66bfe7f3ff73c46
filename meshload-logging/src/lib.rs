//! Structured logging infrastructure for meshload
//!
//! This crate provides:
//! - Subscriber initialisation driven by the `logging` configuration domain
//! - Endpoint call tracing that records how long each emulated call took
//! - Stressor task logging

pub mod init;
pub mod trace;

// Re-export main types for convenience
pub use init::{init_logging_from_config, init_simple_tracing};
pub use trace::{log_cpu_task, EndpointCallTrace};
