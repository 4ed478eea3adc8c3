//! Health Check API Handler

use axum::Json;
use nova_core::dto::system::HealthResponse;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
