//! Router assembly

use super::handlers::{self, AppState};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

const MAX_BODY_SIZE: usize = 64 * 1024;

/// Build the service router with tracing and body-limit middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/pregnancy/weeks/:week", get(handlers::get_week))
        .route(
            "/api/v1/pregnancy/trimesters/:trimester",
            get(handlers::get_trimester),
        )
        .route("/api/v1/pregnancy/search", post(handlers::search))
        .route(
            "/api/v1/pregnancy/personalized",
            post(handlers::personalized),
        )
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE)),
        )
        .with_state(state)
}
