//! API Module
//!
//! HTTP API layer for the gateway.
//! Each submodule handles endpoints for a specific concern.

pub mod error;
pub mod health;
pub mod pipeline;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::service::PipelineRunner;

/// Create the main API router with all endpoints
pub fn create_router(runner: Arc<PipelineRunner>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Pipeline endpoints
        .route("/run-beans-pipeline", post(pipeline::run_beans_pipeline))
        // Add state and middleware
        .with_state(runner)
        .layer(TraceLayer::new_for_http())
}
