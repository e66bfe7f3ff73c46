use std::collections::HashMap;
use std::sync::Arc;

use meshload_core::EndpointDefinition;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::Result;

/// Shared name-to-definition lookup.
///
/// Clones are handles to the same table. Readers never block each other and
/// see either the table before or after a registration, never a partial
/// entry.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: Arc<RwLock<HashMap<String, Arc<EndpointDefinition>>>>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register `endpoint`, returning the definition it replaced.
    ///
    /// A later definition with the same name wins.
    pub async fn register(
        &self,
        endpoint: EndpointDefinition,
    ) -> Result<Option<Arc<EndpointDefinition>>> {
        endpoint.validate()?;

        let name = endpoint.name.clone();
        let mut routes = self.routes.write().await;
        let previous = routes.insert(name.clone(), Arc::new(endpoint));

        if previous.is_some() {
            warn!("Endpoint {} registered twice, replacing previous definition", name);
        } else {
            info!("Registered endpoint /{}", name);
        }

        Ok(previous)
    }

    pub async fn get(&self, name: &str) -> Option<Arc<EndpointDefinition>> {
        self.routes.read().await.get(name).cloned()
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.routes.read().await.contains_key(name)
    }

    pub async fn len(&self) -> usize {
        self.routes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.routes.read().await.is_empty()
    }

    /// Registered endpoint names, sorted
    pub async fn names(&self) -> Vec<String> {
        let routes = self.routes.read().await;
        let mut names: Vec<String> = routes.keys().cloned().collect();
        names.sort();
        names
    }
}
