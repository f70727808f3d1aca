//! # REST Routes
//!
//! Router assembly for the quote API.

use crate::api::rest::handlers::{AppState, health, method_not_allowed, send_quote};
use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Path of the quote endpoint.
pub const SEND_QUOTE_PATH: &str = "/api/send-quote";

/// Creates the router with CORS and request tracing applied.
///
/// Every `OPTIONS` request is answered by the CORS layer with an empty 200
/// carrying the allowed origin, methods and headers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let trace = TraceLayer::new_for_http()
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health))
        .route(
            SEND_QUOTE_PATH,
            post(send_quote).fallback(method_not_allowed),
        )
        .layer(cors)
        .layer(trace)
        .with_state(state)
}
