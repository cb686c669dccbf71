// file: src/gateway/router.rs
// description: route table and middleware for the gateway
// reference: https://docs.rs/axum/latest/axum/struct.Router.html

use crate::gateway::handlers::{
    handle_health, handle_index, handle_query, handle_root, handle_status,
};
use crate::gateway::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/api/github/index", post(handle_index))
        .route("/api/github/query", post(handle_query))
        .route("/api/github/status", get(handle_status))
        .with_state(state)
        // Any origin, method and header; credentials are echoed back per origin.
        .layer(CorsLayer::very_permissive())
}
