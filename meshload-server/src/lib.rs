//! meshload HTTP server
//!
//! Serves the root liveness endpoint and one route per registered endpoint
//! definition. Each endpoint call runs the task dispatcher on the blocking
//! pool and answers with the aggregated per-kind execution report.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod startup;
pub mod state;

// Re-export main components
pub use errors::{WebError, WebResult};
pub use startup::{shutdown_signal, Server};
pub use state::AppState;
