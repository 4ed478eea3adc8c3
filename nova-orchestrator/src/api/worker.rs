//! Worker API Handler

use axum::{Json, extract::State};
use nova_core::dto::system::TickResponse;

use crate::api::error::ApiResult;
use crate::service::JobService;

/// POST /worker/tick
/// Process at most one queued job synchronously
pub async fn tick(State(service): State<JobService>) -> ApiResult<Json<TickResponse>> {
    let processed = service.process_next().await?;

    tracing::debug!("Manual tick processed a job: {}", processed);

    Ok(Json(TickResponse { processed }))
}
