//! Route table and handlers.

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use log::{info, warn};
use parley_rs_core::{CoreError, GatewayError, InvocationRequest, SessionOrchestrator};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub const PING_ENDPOINT: &str = "/ping";
pub const INVOCATIONS_ENDPOINT: &str = "/invocations";

/// Body returned by a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub result: String,
    pub actor_id: String,
    pub session_id: String,
}

struct AppState {
    orchestrator: SessionOrchestrator,
}

/// Build the application router around an orchestrator.
pub fn router(orchestrator: SessionOrchestrator) -> Router {
    let state = Arc::new(AppState { orchestrator });
    Router::new()
        .route(PING_ENDPOINT, get(handle_ping))
        .route(INVOCATIONS_ENDPOINT, post(handle_invocations))
        .with_state(state)
}

async fn handle_ping() -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        })),
    )
        .into_response()
}

async fn handle_invocations(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: InvocationRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!("rejected undecodable invocation body (len={}, err={err})", body.len());
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_request_body",
                format!("invalid request body: {err}"),
            );
        }
    };
    info!(
        "received invocation (actor_id={}, session_id={})",
        request.actor_id.as_deref().unwrap_or("-"),
        request.session_id.as_deref().unwrap_or("-")
    );

    match state.orchestrator.invoke(request).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(InvocationResponse {
                result: outcome.result,
                actor_id: outcome.actor_id,
                session_id: outcome.session_id,
            }),
        )
            .into_response(),
        Err(err) => {
            let (status, code) = classify(&err);
            error_response(status, code, err.to_string())
        }
    }
}

/// Status and error code reported for a failed invocation.
fn classify(err: &CoreError) -> (StatusCode, &'static str) {
    match err {
        CoreError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
        CoreError::Normalization(_) => (StatusCode::INTERNAL_SERVER_ERROR, "normalization_failed"),
        CoreError::Gateway(GatewayError::Invocation(_)) => {
            (StatusCode::BAD_GATEWAY, "model_invocation_failed")
        }
        CoreError::Gateway(GatewayError::Extraction(_)) => {
            (StatusCode::BAD_GATEWAY, "response_extraction_failed")
        }
    }
}

fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::classify;
    use axum::http::StatusCode;
    use parley_rs_core::{CoreError, GatewayError};

    #[test]
    fn gateway_failures_map_to_bad_gateway() {
        let invocation = CoreError::Gateway(GatewayError::Invocation("down".to_string()));
        let extraction = CoreError::Gateway(GatewayError::Extraction("empty".to_string()));
        assert_eq!(classify(&invocation).0, StatusCode::BAD_GATEWAY);
        assert_eq!(classify(&extraction).0, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn request_and_normalization_failures_map_to_client_and_server_errors() {
        let invalid = CoreError::InvalidRequest("actorId is required".to_string());
        let normalization = CoreError::Normalization("x".to_string());
        assert_eq!(classify(&invalid), (StatusCode::BAD_REQUEST, "invalid_request"));
        assert_eq!(
            classify(&normalization).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
