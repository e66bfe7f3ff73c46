//! HTTP error types
//!
//! Every error is rendered with the same body shape as a successful call:
//! `{"message": ..., "endpoint": ..., "tasks": {}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use meshload_core::EndpointResponse;
use meshload_execution::ExecutionError;
use thiserror::Error;
use tracing::error;

use crate::handlers::endpoint_json;

/// Error type of the HTTP front door
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Endpoint {endpoint} doesn't exist")]
    EndpointNotFound { endpoint: String },

    #[error("Endpoint {endpoint} failed: {source}")]
    Execution {
        endpoint: String,
        #[source]
        source: ExecutionError,
    },

    #[error("Endpoint {endpoint} failed: {message}")]
    Internal { endpoint: String, message: String },

    #[error("Failed to serialize response of endpoint {endpoint}: {message}")]
    Serialization { endpoint: String, message: String },
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    pub fn endpoint_not_found(endpoint: impl Into<String>) -> Self {
        WebError::EndpointNotFound {
            endpoint: endpoint.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::EndpointNotFound { .. } => StatusCode::NOT_FOUND,
            WebError::Execution { .. }
            | WebError::Internal { .. }
            | WebError::Serialization { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Endpoint the failed request addressed
    pub fn endpoint(&self) -> &str {
        match self {
            WebError::EndpointNotFound { endpoint }
            | WebError::Execution { endpoint, .. }
            | WebError::Internal { endpoint, .. }
            | WebError::Serialization { endpoint, .. } => endpoint,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = EndpointResponse::failure(self.endpoint(), self.to_string());

        match endpoint_json(status, &body) {
            Ok(response) => response,
            Err(e) => {
                // Last resort, the error body itself could not be encoded
                error!(error = %e, "Failed to render error response");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{}\n", e)).into_response()
            }
        }
    }
}
