//! Task dispatcher
//!
//! Dispatch of one endpoint call:
//!
//! 1. Every registered stressor is asked whether the endpoint declares a
//!    profile for it; only applicable stressors run.
//! 2. `sequential` endpoints run the applicable kinds one after another on the
//!    calling thread. `parallel` endpoints run them concurrently.
//! 3. A kind asking for more than one execution fans out over scoped threads,
//!    one per execution, all joined before its fragment is merged. A single
//!    execution runs on the current thread.
//! 4. Each kind merges exactly one fragment: its service tag once per
//!    execution, paired with that execution's own measured cost.
//!
//! Every spawned thread is joined whatever its siblings did. Panics and
//! errors are collected after the join and fail the whole dispatch, so a
//! caller never sees a partial aggregate.

use std::any::Any;
use std::io;
use std::sync::Arc;
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::Duration;

use meshload_config::{MeshloadConfig, ServiceConfig};
use meshload_core::{EndpointDefinition, EndpointResponse, ExecutionMode, TaskResponse};
use tracing::{debug, warn, Span};

use crate::aggregator::ResponseAggregator;
use crate::cpu::CpuStressor;
use crate::error::{ExecutionError, ExecutionResult};
use crate::stressor::Stressor;

/// Configuration for the dispatcher
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Identity of the emulated service, used in service identity tags
    pub service: ServiceConfig,
    /// Hold a `ThreadPin` while each stress runs, costs are measured the same either way
    pub isolate_threads: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            isolate_threads: true,
        }
    }
}

impl From<&MeshloadConfig> for DispatcherConfig {
    fn from(config: &MeshloadConfig) -> Self {
        Self {
            service: config.service.clone(),
            isolate_threads: config.execution.isolate_threads,
        }
    }
}

/// Runs the stressors of an endpoint and aggregates their results
pub struct TaskDispatcher {
    config: DispatcherConfig,
    stressors: Vec<Arc<dyn Stressor>>,
}

impl TaskDispatcher {
    /// Create a dispatcher with the built-in stressor set
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config,
            stressors: vec![Arc::new(CpuStressor::new())],
        }
    }

    /// Create a dispatcher with an explicit stressor set, in dispatch order
    pub fn with_stressors(config: DispatcherConfig, stressors: Vec<Arc<dyn Stressor>>) -> Self {
        Self { config, stressors }
    }

    /// Add a stressor after the existing ones
    pub fn register_stressor(&mut self, stressor: Arc<dyn Stressor>) {
        self.stressors.push(stressor);
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Kinds of all registered stressors, in dispatch order
    pub fn kinds(&self) -> Vec<&'static str> {
        self.stressors.iter().map(|s| s.kind()).collect()
    }

    /// Service identity tag of `endpoint`
    pub fn service_identity(&self, endpoint: &EndpointDefinition) -> String {
        self.config.service.identity_for(&endpoint.name)
    }

    /// Run every applicable stressor of `endpoint` and return the aggregated response
    pub fn execute(&self, endpoint: &EndpointDefinition) -> ExecutionResult<EndpointResponse> {
        let applicable: Vec<&dyn Stressor> = self
            .stressors
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| s.is_applicable(endpoint))
            .collect();

        debug!(
            endpoint = %endpoint.name,
            mode = %endpoint.execution_mode,
            stressors = applicable.len(),
            "Dispatching endpoint"
        );

        let aggregator = ResponseAggregator::new();

        match endpoint.execution_mode {
            ExecutionMode::Parallel if applicable.len() > 1 => {
                self.run_kinds_concurrently(&applicable, endpoint, &aggregator)?;
            }
            _ => {
                for stressor in &applicable {
                    self.run_kind(*stressor, endpoint, &aggregator)?;
                }
            }
        }

        Ok(EndpointResponse::for_endpoint(&endpoint.name).with_tasks(aggregator.into_tasks()))
    }

    fn run_kinds_concurrently(
        &self,
        stressors: &[&dyn Stressor],
        endpoint: &EndpointDefinition,
        aggregator: &ResponseAggregator,
    ) -> ExecutionResult<()> {
        let span = Span::current();

        let outcomes = thread::scope(|scope| {
            let handles = stressors
                .iter()
                .map(|stressor| {
                    let stressor = *stressor;
                    let span = span.clone();
                    let handle = spawn_named(scope, format!("{}-kind", stressor.kind()), move || {
                        let _entered = span.enter();
                        self.run_kind(stressor, endpoint, aggregator)
                    });
                    (stressor.kind(), handle)
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|(kind, handle)| join_scoped(kind, handle))
                .collect::<Vec<_>>()
        });

        // Kind-level failures are reported as-is, the first one wins
        let total = outcomes.len();
        let failures: Vec<ExecutionError> = outcomes.into_iter().filter_map(Result::err).collect();
        match failures.into_iter().next() {
            Some(first) => {
                warn!(endpoint = %endpoint.name, total, error = %first, "Stressor kind failed");
                Err(first)
            }
            None => Ok(()),
        }
    }

    fn run_kind(
        &self,
        stressor: &dyn Stressor,
        endpoint: &EndpointDefinition,
        aggregator: &ResponseAggregator,
    ) -> ExecutionResult<()> {
        let executions = stressor.executions(endpoint).max(1);

        let measured = if executions > 1 {
            self.fan_out(stressor, endpoint, executions)?
        } else {
            vec![stressor.execute(endpoint, self.config.isolate_threads)?]
        };

        let service = self.service_identity(endpoint);
        let mut fragment = TaskResponse::new();
        for cost in &measured {
            fragment.push(service.clone(), cost.as_secs_f32());
        }

        stressor.report(endpoint, &fragment);
        aggregator.merge(stressor.kind(), fragment);
        Ok(())
    }

    fn fan_out(
        &self,
        stressor: &dyn Stressor,
        endpoint: &EndpointDefinition,
        executions: u32,
    ) -> ExecutionResult<Vec<Duration>> {
        let kind = stressor.kind();
        let isolate = self.config.isolate_threads;
        let span = Span::current();

        let outcomes = thread::scope(|scope| {
            let handles = (0..executions)
                .map(|index| {
                    let span = span.clone();
                    spawn_named(scope, format!("{}-{}", kind, index), move || {
                        let _entered = span.enter();
                        stressor.execute(endpoint, isolate)
                    })
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|handle| join_scoped(kind, handle))
                .collect::<Vec<_>>()
        });

        let total = outcomes.len();
        let mut measured = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(cost) => measured.push(cost),
                Err(e) => failures.push(e),
            }
        }

        match failures.len() {
            0 => Ok(measured),
            failed => {
                let first = failures.swap_remove(0);
                warn!(
                    endpoint = %endpoint.name,
                    kind,
                    failed,
                    total,
                    error = %first,
                    "Stressor fan-out failed"
                );
                Err(ExecutionError::FanOutFailed {
                    kind: kind.to_string(),
                    failed,
                    total,
                    first: Box::new(first),
                })
            }
        }
    }
}

fn spawn_named<'scope, 'env, T, F>(
    scope: &'scope Scope<'scope, 'env>,
    name: String,
    f: F,
) -> io::Result<ScopedJoinHandle<'scope, ExecutionResult<T>>>
where
    F: FnOnce() -> ExecutionResult<T> + Send + 'scope,
    T: Send + 'scope,
{
    thread::Builder::new().name(name).spawn_scoped(scope, f)
}

/// Join one scoped thread, folding spawn errors and panics into `ExecutionError`
fn join_scoped<T>(
    kind: &str,
    handle: io::Result<ScopedJoinHandle<'_, ExecutionResult<T>>>,
) -> ExecutionResult<T> {
    let handle = handle.map_err(|e| ExecutionError::SpawnFailed {
        kind: kind.to_string(),
        reason: e.to_string(),
    })?;

    match handle.join() {
        Ok(result) => result,
        Err(payload) => Err(ExecutionError::StressorPanicked {
            kind: kind.to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
