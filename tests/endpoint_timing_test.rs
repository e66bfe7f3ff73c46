//! Latency properties of emulated endpoints

mod common;

use anyhow::Result;
use common::{client, cores, TestServer};
use meshload_config::{EndpointsConfig, MeshloadConfig};
use meshload_core::{EndpointDefinition, ExecutionMode};
use serde_json::Value;
use std::time::{Duration, Instant};

async fn timed_call(server: &TestServer, path: &str) -> Result<(Value, Duration)> {
    let started = Instant::now();
    let body: Value = client().get(server.url(path)).send().await?.json().await?;
    Ok((body, started.elapsed()))
}

fn execution_times(body: &Value) -> Vec<f64> {
    body["tasks"]["cpu_task"]["execution_times"]
        .as_array()
        .map(|times| times.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default()
}

fn server_config() -> MeshloadConfig {
    let mut config = MeshloadConfig::default();
    config.endpoints = EndpointsConfig::new(vec![
        EndpointDefinition::new("single").with_cpu_complexity(0.2, 1),
        EndpointDefinition::new("wide")
            .with_execution_mode(ExecutionMode::Parallel)
            .with_cpu_complexity(0.2, 2),
        EndpointDefinition::new("idle"),
    ]);
    config
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_single_thread_latency_covers_cost() -> Result<()> {
    let server = TestServer::start(server_config()).await?;

    let (body, latency) = timed_call(&server, "/single").await?;
    let times = execution_times(&body);

    assert_eq!(times.len(), 1);
    assert!(times[0] >= 0.2 && times[0] < 0.3, "cost {}", times[0]);
    assert!(latency >= Duration::from_millis(200));

    server.stop().await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_parallel_threads_overlap() -> Result<()> {
    let server = TestServer::start(server_config()).await?;

    let (body, latency) = timed_call(&server, "/wide").await?;
    let times = execution_times(&body);

    assert_eq!(times.len(), 2);
    assert!(times.iter().all(|t| *t >= 0.2));
    assert!(latency >= Duration::from_millis(200));
    if cores() >= 4 {
        assert!(latency < Duration::from_millis(390), "threads ran serially: {:?}", latency);
    }

    server.stop().await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_idle_endpoint_is_fast() -> Result<()> {
    let server = TestServer::start(server_config()).await?;

    let (body, latency) = timed_call(&server, "/idle").await?;

    assert!(execution_times(&body).is_empty());
    assert!(latency < Duration::from_millis(200));

    server.stop().await
}
