use crate::state::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

/// Liveness plus queue gauges
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "pending": state.job_queue.pending(),
        "running": state.job_queue.running(),
        "workers": state.job_queue.concurrency(),
    }))
}
