//! Shared helpers for end-to-end tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use meshload_config::MeshloadConfig;
use meshload_registry::RouteRegistry;
use meshload_server::Server;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A server running on an ephemeral local port
pub struct TestServer {
    pub addr: SocketAddr,
    pub registry: RouteRegistry,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<()>>,
}

impl TestServer {
    /// Start serving `config` and wait until all configured endpoints are routable
    pub async fn start(config: MeshloadConfig) -> Result<Self> {
        let expected = config.endpoints.len();
        let server = Server::new(config);
        let registry = server.registry().clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(server.serve(listener, async move {
            let _ = rx.await;
        }));

        for _ in 0..200 {
            if registry.len().await >= expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        Ok(Self {
            addr,
            registry,
            shutdown: Some(tx),
            handle,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger graceful shutdown and wait for the server to stop
    pub async fn stop(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await?
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("client")
}

pub fn cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
