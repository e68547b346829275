//! Axum router construction.

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware::Limits, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState, limits: Limits) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/encode",
            get(handlers::encode_form).post(handlers::encode_submit),
        )
        .route(
            "/decode",
            get(handlers::decode_form).post(handlers::decode_submit),
        )
        .route("/api/encode", post(handlers::api_encode))
        .route("/api/decode", post(handlers::api_decode))
        .route("/api/key", get(handlers::api_key))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(limits.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(limits.request_timeout))
        .layer(CompressionLayer::new())
        .with_state(state)
}
