//! Endpoint definition feed
//!
//! Definitions are produced by whoever owns the configuration and consumed by
//! a single task that registers them. The feed may run concurrently with
//! request serving; an endpoint becomes routable as soon as its definition
//! has been consumed.

use meshload_core::EndpointDefinition;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{RegistryError, Result};
use crate::registry::RouteRegistry;

/// Create a bounded endpoint feed holding up to `buffer` pending definitions
pub fn endpoint_feed(buffer: usize) -> (EndpointSender, EndpointReceiver) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    (EndpointSender { tx }, EndpointReceiver { rx })
}

/// Producer side of the feed
#[derive(Debug, Clone)]
pub struct EndpointSender {
    tx: mpsc::Sender<EndpointDefinition>,
}

impl EndpointSender {
    /// Queue one definition, waiting while the feed is full
    pub async fn send(&self, endpoint: EndpointDefinition) -> Result<()> {
        self.tx
            .send(endpoint)
            .await
            .map_err(|e| RegistryError::FeedClosed(e.0.name))
    }

    /// Queue every definition of `endpoints`, in order
    pub async fn send_all<I>(&self, endpoints: I) -> Result<usize>
    where
        I: IntoIterator<Item = EndpointDefinition>,
    {
        let mut sent = 0;
        for endpoint in endpoints {
            self.send(endpoint).await?;
            sent += 1;
        }
        Ok(sent)
    }
}

/// Consumer side of the feed
#[derive(Debug)]
pub struct EndpointReceiver {
    rx: mpsc::Receiver<EndpointDefinition>,
}

impl EndpointReceiver {
    /// Register every definition until all senders are dropped.
    ///
    /// Invalid definitions are logged and skipped. Returns the number of
    /// definitions registered.
    pub async fn consume(mut self, registry: RouteRegistry) -> usize {
        let mut registered = 0;

        while let Some(endpoint) = self.rx.recv().await {
            let name = endpoint.name.clone();
            match registry.register(endpoint).await {
                Ok(_) => {
                    debug!(endpoint = %name, "Consumed endpoint definition");
                    registered += 1;
                }
                Err(e) => warn!(endpoint = %name, error = %e, "Skipping endpoint definition"),
            }
        }

        info!("Endpoint feed closed after registering {} endpoints", registered);
        registered
    }
}
