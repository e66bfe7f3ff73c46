//! Endpoint call tracing
//!
//! Every emulated call gets an `endpoint_call` span. Work done while serving
//! the call (including stressor threads that enter the span) is attributed to
//! it, and the call's wall time is logged when the trace is finished.

use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, Span};

/// Wall-clock trace of one endpoint call
#[derive(Debug)]
pub struct EndpointCallTrace {
    endpoint: String,
    started: Instant,
    span: Span,
}

impl EndpointCallTrace {
    /// Open the trace for a call to `endpoint`
    pub fn start(endpoint: &str, execution_mode: &str) -> Self {
        let span = info_span!("endpoint_call", endpoint = %endpoint, mode = %execution_mode);
        debug!(parent: &span, "Endpoint call started");

        Self {
            endpoint: endpoint.to_string(),
            started: Instant::now(),
            span,
        }
    }

    /// Span to enter while serving the call
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Close the trace and log the outcome, returning the call's wall time
    pub fn finish(self, status: u16) -> Duration {
        let elapsed = self.started.elapsed();
        info!(
            parent: &self.span,
            endpoint = %self.endpoint,
            status,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Endpoint call completed"
        );
        elapsed
    }
}

/// Log a finished CPU stress task
pub fn log_cpu_task(endpoint: &str, execution_time: f32, threads: u32, measured: &[f32]) {
    debug!(
        endpoint = %endpoint,
        execution_time,
        threads,
        measured = ?measured,
        "CPU task executed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_measures_wall_time() {
        let trace = EndpointCallTrace::start("endpoint1", "sequential");
        assert_eq!(trace.endpoint(), "endpoint1");

        std::thread::sleep(Duration::from_millis(20));
        let elapsed = trace.finish(200);
        assert!(elapsed >= Duration::from_millis(20));
    }

    #[test]
    fn test_log_cpu_task_without_subscriber() {
        // Logging with no subscriber installed is a no-op
        log_cpu_task("endpoint1", 0.5, 2, &[0.5, 0.5]);
    }
}
