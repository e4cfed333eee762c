//! Pipeline API Handlers
//!
//! HTTP endpoint that submits a pipeline run and reports its first decisive
//! state.

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use beans_core::dto::run::RunPipelineResponse;
use serde_json::Value as JsonValue;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::service::PipelineRunner;

/// POST /run-beans-pipeline
/// Submit a pipeline job and wait until it is running or failed
///
/// The response is only sent once polling stops, which can take several
/// poll intervals. The body is parsed as JSON regardless of `Content-Type`.
pub async fn run_beans_pipeline(
    State(runner): State<Arc<PipelineRunner>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<RunPipelineResponse>)> {
    let request_id = Uuid::new_v4();
    let body: JsonValue = serde_json::from_slice(&body)?;

    let job = runner
        .run(&body)
        .instrument(tracing::info_span!("run_pipeline", %request_id))
        .await?;

    let response = RunPipelineResponse::from_decision(&job);
    tracing::info!(
        "Request {} answered with {}: {}",
        request_id,
        response.status_code,
        response.message
    );

    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(response)))
}
