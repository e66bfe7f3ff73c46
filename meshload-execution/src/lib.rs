//! meshload Execution Engine
//!
//! This crate turns an endpoint's declared cost profile into real resource
//! consumption. The [`TaskDispatcher`] selects the applicable [`Stressor`]s for
//! an endpoint, runs them sequentially or fanned out over scoped threads, and
//! merges every execution's measured cost into a per-request
//! [`ResponseAggregator`].

pub mod aggregator;
pub mod clock;
pub mod cpu;
pub mod dispatcher;
pub mod error;
pub mod pin;
pub mod stressor;

// Re-export main types
pub use aggregator::ResponseAggregator;
pub use clock::{thread_cpu_time, ThreadCpuTimer};
pub use cpu::{stress_cpu, CpuStressor};
pub use dispatcher::{DispatcherConfig, TaskDispatcher};
pub use error::{ExecutionError, ExecutionResult};
pub use pin::{is_pinned, ThreadPin};
pub use stressor::Stressor;
