//! API Module
//!
//! HTTP API layer for the orchestrator. Handlers translate requests into
//! job service calls and nothing more.

pub mod error;
pub mod health;
pub mod job;
pub mod worker;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::service::JobService;

/// Create the main API router with all endpoints
pub fn create_router(service: JobService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Job endpoints
        .route("/jobs", get(job::list_jobs).post(job::create_job))
        .route("/jobs/{id}", get(job::get_job))
        .route("/jobs/{id}/logs", get(job::get_job_logs))
        .route("/jobs/{id}/retry", post(job::retry_job))
        // Manual processing step
        .route("/worker/tick", post(worker::tick))
        // Add state and middleware
        .with_state(service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
