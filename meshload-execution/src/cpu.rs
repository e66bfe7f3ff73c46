//! CPU stressor

use std::time::Duration;

use meshload_core::{EndpointDefinition, TaskResponse, CPU_TASK};
use tracing::trace;

use crate::clock::ThreadCpuTimer;
use crate::error::{ExecutionError, ExecutionResult};
use crate::pin::ThreadPin;
use crate::stressor::Stressor;

/// Busy-wait until the calling thread has consumed `execution_time` seconds of
/// its own CPU time, returning the CPU time actually consumed.
///
/// Non-positive (and non-finite) execution times are a no-op. With
/// `isolate_thread` the measurement is pinned to the calling thread for its
/// whole duration.
pub fn stress_cpu(execution_time: f32, isolate_thread: bool) -> ExecutionResult<Duration> {
    if !execution_time.is_finite() || execution_time <= 0.0 {
        return Ok(Duration::ZERO);
    }

    let target = Duration::try_from_secs_f32(execution_time).map_err(|e| {
        ExecutionError::InvalidProfile(format!("execution_time {}: {}", execution_time, e))
    })?;

    let _pin = isolate_thread.then(ThreadPin::acquire);
    let timer = ThreadCpuTimer::start()?;

    loop {
        let elapsed = timer.elapsed()?;
        if elapsed >= target {
            trace!(target_secs = execution_time, elapsed = ?elapsed, "CPU stress finished");
            return Ok(elapsed);
        }
        std::hint::spin_loop();
    }
}

/// Stressor for endpoints declaring a `cpu_complexity` profile
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuStressor;

impl CpuStressor {
    pub fn new() -> Self {
        Self
    }
}

impl Stressor for CpuStressor {
    fn kind(&self) -> &'static str {
        CPU_TASK
    }

    fn is_applicable(&self, endpoint: &EndpointDefinition) -> bool {
        endpoint.cpu_complexity.is_some()
    }

    fn executions(&self, endpoint: &EndpointDefinition) -> u32 {
        endpoint
            .cpu_complexity
            .map(|cpu| cpu.threads.max(1))
            .unwrap_or(1)
    }

    fn execute(
        &self,
        endpoint: &EndpointDefinition,
        isolate_thread: bool,
    ) -> ExecutionResult<Duration> {
        match &endpoint.cpu_complexity {
            Some(cpu) => stress_cpu(cpu.execution_time, isolate_thread),
            None => Ok(Duration::ZERO),
        }
    }

    fn report(&self, endpoint: &EndpointDefinition, fragment: &TaskResponse) {
        if let Some(cpu) = &endpoint.cpu_complexity {
            meshload_logging::log_cpu_task(
                &endpoint.name,
                cpu.execution_time,
                cpu.threads,
                &fragment.execution_times,
            );
        }
    }
}
