//! HTTP layer
//!
//! Thin axum surface over the pipeline:
//! - GET  /api/v1/pregnancy/weeks/{week}
//! - GET  /api/v1/pregnancy/trimesters/{trimester}
//! - POST /api/v1/pregnancy/search
//! - POST /api/v1/pregnancy/personalized
//! - GET  /health, GET /metrics

pub mod handlers;
pub mod routes;

pub use handlers::{ApiError, AppState};
pub use routes::build_router;
