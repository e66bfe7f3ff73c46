use std::sync::Arc;

use meshload_execution::TaskDispatcher;
use meshload_registry::RouteRegistry;

/// Shared state of every request handler
#[derive(Clone)]
pub struct AppState {
    pub registry: RouteRegistry,
    pub dispatcher: Arc<TaskDispatcher>,
}

impl AppState {
    pub fn new(registry: RouteRegistry, dispatcher: TaskDispatcher) -> Self {
        Self {
            registry,
            dispatcher: Arc::new(dispatcher),
        }
    }
}
