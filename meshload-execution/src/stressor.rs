//! Stressor contract

use std::time::Duration;

use meshload_core::{EndpointDefinition, TaskResponse};

use crate::error::ExecutionResult;

/// A unit of synthetic resource consumption.
///
/// Each stressor kind reads its own cost profile from the endpoint definition.
/// The dispatcher calls [`Stressor::execute`] once per execution returned by
/// [`Stressor::executions`], on as many threads, and reports each execution's
/// measured cost under [`Stressor::kind`].
pub trait Stressor: Send + Sync {
    /// Key of this stressor's results in the response `tasks` map
    fn kind(&self) -> &'static str;

    /// Whether `endpoint` declares a cost profile for this stressor
    fn is_applicable(&self, endpoint: &EndpointDefinition) -> bool;

    /// Number of concurrent executions the profile asks for
    fn executions(&self, _endpoint: &EndpointDefinition) -> u32 {
        1
    }

    /// Consume the declared resource once and return the measured cost
    fn execute(
        &self,
        endpoint: &EndpointDefinition,
        isolate_thread: bool,
    ) -> ExecutionResult<Duration>;

    /// Hook called with the merged fragment after all executions joined
    fn report(&self, _endpoint: &EndpointDefinition, _fragment: &TaskResponse) {}
}
