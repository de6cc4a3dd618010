use crate::error::{Result, ServiceError};
use crate::jobs::{Job, JobRequest, RequestError};
use crate::state::AppState;
use axum::{Json, body::Bytes, extract::State, http::StatusCode, response::IntoResponse};
use flate2::read::GzDecoder;
use serde::Serialize;
use std::io::Read;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    /// Jobs that were waiting before this one.
    pub num_jobs: usize,
}

/// Accept one gzip-compressed job and enqueue it
pub async fn submit_job(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse> {
    let limit = state.config.server.max_decompressed_bytes;
    let json = tokio::task::spawn_blocking(move || inflate(&body, limit))
        .await
        .map_err(|e| ServiceError::Internal(format!("Task join error: {}", e)))??;

    let request: JobRequest = serde_json::from_slice(&json)
        .map_err(|e| ServiceError::InvalidRequest(format!("Malformed job: {}", e)))?;
    let job = Job::try_from(request).map_err(|e| match e {
        RequestError::Rejected(rejection) => ServiceError::Rejected(rejection),
        other => ServiceError::InvalidRequest(other.to_string()),
    })?;

    let job_id = job.job_id.clone();
    let kind = job.kind();
    let depth = state.job_queue.submit(job)?;

    let response = SubmitResponse {
        success: true,
        message: format!("Job {} ({}) accepted", job_id, kind),
        num_jobs: depth,
    };
    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// Inflates a gzip body, refusing to produce more than `limit` bytes.
pub fn inflate(body: &[u8], limit: usize) -> Result<Vec<u8>> {
    if !body.starts_with(&GZIP_MAGIC) {
        return Err(ServiceError::InvalidRequest(
            "Request body must be gzip-compressed JSON".to_string(),
        ));
    }

    let mut decoded = Vec::new();
    GzDecoder::new(body)
        .take(limit as u64 + 1)
        .read_to_end(&mut decoded)
        .map_err(|e| ServiceError::InvalidRequest(format!("Invalid gzip body: {}", e)))?;

    if decoded.len() > limit {
        return Err(ServiceError::PayloadTooLarge { limit });
    }
    Ok(decoded)
}
