//! Request handlers

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use meshload_core::EndpointResponse;
use meshload_logging::EndpointCallTrace;
use tracing::{debug, error};

use crate::errors::{WebError, WebResult};
use crate::state::AppState;

/// Encode `body` as a JSON response, newline terminated
pub fn endpoint_json(status: StatusCode, body: &EndpointResponse) -> WebResult<Response> {
    let mut bytes = serde_json::to_vec(body).map_err(|e| WebError::Serialization {
        endpoint: body.endpoint.clone(),
        message: e.to_string(),
    })?;
    bytes.push(b'\n');

    Ok((status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response())
}

/// Liveness endpoint, always 200 with an empty report
pub async fn root_handler() -> Response {
    match endpoint_json(StatusCode::OK, &EndpointResponse::for_endpoint("")) {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

/// Run the stressors of a registered endpoint
pub async fn endpoint_handler(
    State(state): State<AppState>,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    // A segment that does not decode to UTF-8 cannot name any endpoint
    let name = match path {
        Ok(Path(name)) => name,
        Err(rejection) => {
            debug!(path = %uri.path(), error = %rejection, "Undecodable endpoint segment");
            return WebError::endpoint_not_found(requested_endpoint(&uri)).into_response();
        }
    };

    let Some(endpoint) = state.registry.get(&name).await else {
        debug!(endpoint = %name, "Unknown endpoint requested");
        return WebError::endpoint_not_found(name).into_response();
    };

    let trace = EndpointCallTrace::start(&endpoint.name, endpoint.execution_mode.as_str());
    let span = trace.span().clone();
    let dispatcher = state.dispatcher.clone();
    let definition = endpoint.clone();

    // Stressors burn CPU on the calling thread, keep them off the async workers
    let outcome = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        dispatcher.execute(&definition)
    })
    .await;

    let response = match outcome {
        Ok(Ok(report)) => endpoint_json(StatusCode::OK, &report),
        Ok(Err(source)) => Err(WebError::Execution {
            endpoint: endpoint.name.clone(),
            source,
        }),
        Err(join_error) => Err(WebError::Internal {
            endpoint: endpoint.name.clone(),
            message: join_error.to_string(),
        }),
    };

    let response = response.unwrap_or_else(|e| {
        error!(endpoint = %endpoint.name, error = %e, "Endpoint call failed");
        e.into_response()
    });

    trace.finish(response.status().as_u16());
    response
}

/// Any path that is neither `/` nor a single segment
pub async fn fallback_handler(uri: Uri) -> Response {
    debug!(path = %uri.path(), "No route for path");
    WebError::endpoint_not_found(requested_endpoint(&uri)).into_response()
}

/// Requested path without its leading slash, as reported in 404 bodies
fn requested_endpoint(uri: &Uri) -> &str {
    uri.path().trim_start_matches('/')
}
