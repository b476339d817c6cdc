//! HTTP gateway (Axum) for classification, explanation, and article review.
//!
//! This module is primarily used by the `biaslens` server binary.

pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

#[cfg(test)]
mod handler_tests;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the service router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/model", get(handlers::model_info))
        .route("/predict", post(handlers::predict))
        .route("/predict_url", post(handlers::predict_url))
        .route("/batch_predict", post(handlers::batch_predict))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
