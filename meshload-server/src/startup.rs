//! Server startup and shutdown logic

use std::future::Future;

use anyhow::{Context, Result};
use axum::{middleware, routing::any, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use meshload_config::MeshloadConfig;
use meshload_execution::{DispatcherConfig, TaskDispatcher};
use meshload_registry::{endpoint_feed, RouteRegistry};

use crate::handlers::{endpoint_handler, fallback_handler, root_handler};
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Server application struct
pub struct Server {
    config: MeshloadConfig,
    state: AppState,
}

impl Server {
    /// Create a new server instance with an empty route registry
    pub fn new(config: MeshloadConfig) -> Self {
        let dispatcher = TaskDispatcher::new(DispatcherConfig::from(&config));
        Self::with_dispatcher(config, dispatcher)
    }

    /// Create a server running endpoint calls through `dispatcher`
    pub fn with_dispatcher(config: MeshloadConfig, dispatcher: TaskDispatcher) -> Self {
        let state = AppState::new(RouteRegistry::new(), dispatcher);
        Self { config, state }
    }

    pub fn config(&self) -> &MeshloadConfig {
        &self.config
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.state.registry
    }

    /// Build the complete application router
    pub fn build_app(&self) -> Router {
        let mut app = Router::new()
            .route("/", any(root_handler))
            .route("/{endpoint}", any(endpoint_handler))
            .fallback(fallback_handler)
            .with_state(self.state.clone());

        if self.config.server.enable_tracing {
            app = app.layer(TraceLayer::new_for_http());
        }

        if self.config.server.enable_request_id {
            app = app.layer(middleware::from_fn(request_id_middleware));
        }

        app
    }

    /// Feed the configured endpoints into the registry in the background.
    ///
    /// The returned handle resolves to the number of endpoints registered once
    /// the whole feed has been consumed.
    pub fn spawn_endpoint_feed(&self) -> JoinHandle<usize> {
        let (sender, receiver) = endpoint_feed(self.config.server.feed_buffer);
        let consumer = tokio::spawn(receiver.consume(self.state.registry.clone()));

        let endpoints = self.config.endpoints.clone();
        tokio::spawn(async move {
            if let Err(e) = sender.send_all(endpoints).await {
                warn!("Endpoint feed interrupted: {}", e);
            }
        });

        consumer
    }

    /// Bind the configured address and serve until a shutdown signal arrives
    pub async fn start(self) -> Result<()> {
        let addr = self.config.server.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("Starting meshload server for service {}", self.config.service.name);
        self.log_config_summary();

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on `listener` until `shutdown` completes
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Traffic is accepted while the registry is still being fed
        let feed = self.spawn_endpoint_feed();
        let app = self.build_app();

        info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("Server error")?;

        if feed.is_finished() {
            match feed.await {
                Ok(count) => info!("Served {} endpoints", count),
                Err(e) => warn!("Endpoint feed task failed: {}", e),
            }
        } else {
            feed.abort();
        }

        info!("Server shutdown complete");
        Ok(())
    }

    /// Log configuration summary
    fn log_config_summary(&self) {
        let config = &self.config;
        info!("=== meshload Server Configuration ===");
        info!("Service: {}", config.service.name);
        info!("Bind Address: {}:{}", config.server.bind_address, config.server.port);
        info!("Endpoints: {}", config.endpoints.len());
        info!("Max Threads Per Task: {}", config.execution.max_threads_per_task);
        info!("Thread Isolation: {}", enabled(config.execution.isolate_threads));
        info!("Request ID: {}", enabled(config.server.enable_request_id));
        info!("Tracing: {}", enabled(config.server.enable_tracing));
        info!("=====================================");
    }
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "Enabled"
    } else {
        "Disabled"
    }
}

/// Graceful shutdown signal
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use meshload_core::{EndpointDefinition, ExecutionMode};
    use meshload_execution::{ExecutionResult, Stressor};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::middleware::REQUEST_ID_HEADER;

    fn test_config() -> MeshloadConfig {
        let mut config = MeshloadConfig::default();
        config.service.name = "service1".to_string();
        config
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value, bool) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let newline = bytes.ends_with(b"\n");
        (status, serde_json::from_slice(&bytes).unwrap(), newline)
    }

    #[tokio::test]
    async fn test_root_is_always_ok() {
        let server = Server::new(test_config());

        let (status, body, newline) = get(server.build_app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"message": "", "endpoint": "", "tasks": {}}));
        assert!(newline);
    }

    #[tokio::test]
    async fn test_root_accepts_any_method() {
        let app = Server::new(test_config()).build_app();
        let response = app
            .oneshot(Request::builder().method("POST").uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_endpoint_is_404() {
        let server = Server::new(test_config());

        let (status, body, _) = get(server.build_app(), "/doesnotexist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["endpoint"], "doesnotexist");
        assert_eq!(body["message"], "Endpoint doesnotexist doesn't exist");
        assert_eq!(body["tasks"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_undecodable_segment_is_structured_404() {
        let server = Server::new(test_config());

        let (status, body, newline) = get(server.build_app(), "/%FF").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["endpoint"], "%FF");
        assert_eq!(body["message"], "Endpoint %FF doesn't exist");
        assert_eq!(body["tasks"], serde_json::json!({}));
        assert!(newline);
    }

    #[tokio::test]
    async fn test_trailing_slash_keeps_requested_path() {
        let server = Server::new(test_config());
        server
            .registry()
            .register(EndpointDefinition::new("endpoint1"))
            .await
            .unwrap();

        let (status, body, _) = get(server.build_app(), "/endpoint1/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["endpoint"], "endpoint1/");
        assert_eq!(body["message"], "Endpoint endpoint1/ doesn't exist");
    }

    #[tokio::test]
    async fn test_nested_path_is_404() {
        let server = Server::new(test_config());
        server
            .registry()
            .register(EndpointDefinition::new("endpoint1"))
            .await
            .unwrap();

        let (status, body, _) = get(server.build_app(), "/endpoint1/extra").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["endpoint"], "endpoint1/extra");
    }

    #[tokio::test]
    async fn test_endpoint_without_profile() {
        let server = Server::new(test_config());
        server
            .registry()
            .register(EndpointDefinition::new("plain"))
            .await
            .unwrap();

        let (status, body, newline) = get(server.build_app(), "/plain").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["endpoint"], "plain");
        assert_eq!(body["message"], "");
        assert_eq!(body["tasks"], serde_json::json!({}));
        assert!(newline);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_endpoint_reports_cpu_task() {
        let server = Server::new(test_config());
        server
            .registry()
            .register(
                EndpointDefinition::new("endpoint1")
                    .with_execution_mode(ExecutionMode::Parallel)
                    .with_cpu_complexity(0.02, 2),
            )
            .await
            .unwrap();

        let (status, body, _) = get(server.build_app(), "/endpoint1").await;
        assert_eq!(status, StatusCode::OK);

        let cpu = &body["tasks"]["cpu_task"];
        assert_eq!(
            cpu["services"],
            serde_json::json!(["service1/endpoint1", "service1/endpoint1"])
        );
        let times = cpu["execution_times"].as_array().unwrap();
        assert_eq!(times.len(), 2);
        assert!(times.iter().all(|t| t.as_f64().unwrap() >= 0.02));
    }

    /// Panics on every execution
    struct PanickingStressor;

    impl Stressor for PanickingStressor {
        fn kind(&self) -> &'static str {
            "panic_task"
        }

        fn is_applicable(&self, _endpoint: &EndpointDefinition) -> bool {
            true
        }

        fn executions(&self, _endpoint: &EndpointDefinition) -> u32 {
            2
        }

        fn execute(
            &self,
            _endpoint: &EndpointDefinition,
            _isolate_thread: bool,
        ) -> ExecutionResult<Duration> {
            panic!("stressor exploded");
        }
    }

    #[tokio::test]
    async fn test_stressor_failure_is_structured_500() {
        let config = test_config();
        let stressors: Vec<Arc<dyn Stressor>> = vec![Arc::new(PanickingStressor)];
        let dispatcher =
            TaskDispatcher::with_stressors(DispatcherConfig::from(&config), stressors);
        let server = Server::with_dispatcher(config, dispatcher);
        server
            .registry()
            .register(EndpointDefinition::new("fragile"))
            .await
            .unwrap();
        let app = server.build_app();

        let (status, body, newline) = get(app.clone(), "/fragile").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["endpoint"], "fragile");
        assert_eq!(body["tasks"], serde_json::json!({}));
        assert!(body["message"].as_str().unwrap().contains("stressor exploded"));
        assert!(newline);

        // The server keeps answering after a failed call
        let (status, _, _) = get(app, "/").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_header_can_be_disabled() {
        let mut config = test_config();
        config.server.enable_request_id = false;

        let response = Server::new(config)
            .build_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(!response.headers().contains_key(REQUEST_ID_HEADER));

        let response = Server::new(test_config())
            .build_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_servers_have_independent_registries() {
        let first = Server::new(test_config());
        let second = Server::new(test_config());
        first
            .registry()
            .register(EndpointDefinition::new("only-first"))
            .await
            .unwrap();

        let (status, _, _) = get(first.build_app(), "/only-first").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _, _) = get(second.build_app(), "/only-first").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_feed_registers_configured_endpoints() {
        let mut config = test_config();
        config.endpoints = meshload_config::EndpointsConfig::new(vec![
            EndpointDefinition::new("a"),
            EndpointDefinition::new("b").with_cpu_complexity(0.01, 1),
        ]);

        let server = Server::new(config);
        let registered = server.spawn_endpoint_feed().await.unwrap();

        assert_eq!(registered, 2);
        assert_eq!(server.registry().names().await, vec!["a".to_string(), "b".to_string()]);
    }
}
