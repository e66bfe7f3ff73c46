//! Core domain models and types for meshload
//!
//! This crate contains the fundamental types shared by every other crate in
//! the workspace: the immutable endpoint definitions that describe an emulated
//! capability and the response model that reports what a request consumed.
//! It has minimal dependencies and defines the domain language of the emulator.

pub mod endpoint;
pub mod error;
pub mod response;
pub mod types;

// Re-export commonly used types at the crate root
pub use endpoint::{CpuComplexity, EndpointDefinition};
pub use error::{CoreError, Result};
pub use response::{EndpointResponse, TaskResponse, CPU_TASK};
pub use types::{validate_path_segment, ExecutionMode};
