// file: src/gateway/handlers.rs
// description: axum handlers for the gateway HTTP surface
// reference: https://docs.rs/axum

use crate::gateway::forwarding::{self, INDEX_FAILED_MESSAGE, QUERY_FAILED_MESSAGE};
use crate::gateway::state::AppState;
use crate::models::{
    HealthResponse, IndexRequest, QueryRequest, ResponseEnvelope, ServiceInfo, StatusReport,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crate::utils::telemetry::request_span;
use tracing::{Instrument, warn};
use uuid::Uuid;

pub async fn handle_root() -> Json<ServiceInfo> {
    Json(ServiceInfo::running())
}

pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

pub async fn handle_index(
    State(state): State<AppState>,
    payload: Result<Json<IndexRequest>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    request_span("index", request_id).in_scope(|| {
        let request = match payload {
            Ok(Json(request)) => request,
            Err(rejection) => {
                return rejection_response(request_id, INDEX_FAILED_MESSAGE, rejection);
            }
        };

        let envelope = forwarding::start_indexing(&state.dispatcher, &request, request_id);
        Json(envelope).into_response()
    })
}

pub async fn handle_query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    async move {
        let request = match payload {
            Ok(Json(request)) => request,
            Err(rejection) => {
                return rejection_response(request_id, QUERY_FAILED_MESSAGE, rejection);
            }
        };

        let envelope = forwarding::query_repository(&state.mcp, &request, request_id).await;
        Json(envelope).into_response()
    }
    .instrument(request_span("query", request_id))
    .await
}

pub async fn handle_status(State(state): State<AppState>) -> Json<StatusReport> {
    Json(forwarding::status(&state.config))
}

/// Malformed bodies still get an envelope, with the extractor's 4xx status.
fn rejection_response(request_id: Uuid, message: &str, rejection: JsonRejection) -> Response {
    let status = rejection.status();
    warn!(%request_id, status = status.as_u16(), error = %rejection.body_text(), "Rejected request body");

    let status = if status.is_client_error() {
        status
    } else {
        StatusCode::BAD_REQUEST
    };
    (
        status,
        Json(ResponseEnvelope::failure(message, rejection.body_text())),
    )
        .into_response()
}
