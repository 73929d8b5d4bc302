//! `/api/generate` forwarding handler

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::gateway::BACKEND_UNAVAILABLE;

use super::ProxyState;

/// Forward a generate request to the backend and relay its answer
pub async fn forward_generate(State(state): State<ProxyState>, body: Bytes) -> Response {
    let mut request = state.client.post(&state.target);
    if !body.is_empty() {
        request = request.header(header::CONTENT_TYPE, "application/json").body(body);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(target_url = %state.target, error = %e, "Backend unreachable");
            return backend_unavailable();
        }
    };

    let status = StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    match response.bytes().await {
        Ok(payload) => {
            tracing::info!(status = status.as_u16(), bytes = payload.len(), "Relayed generate response");
            (status, [(header::CONTENT_TYPE, "application/json")], payload).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Backend response body lost");
            backend_unavailable()
        }
    }
}

/// Any method other than POST
pub async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, Json(json!({ "error": "Method not allowed" }))).into_response()
}

fn backend_unavailable() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": BACKEND_UNAVAILABLE }))).into_response()
}
