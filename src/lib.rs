//! rollbook: committee rosters and absentee-ballot statistics, produced
//! asynchronously by a bounded worker pool that reports each finished job
//! through a signed callback.
//!
//! The HTTP surface is two routes: `POST /api/v1/jobs` accepts a
//! gzip-compressed job and answers with the queue depth, and `GET /health`
//! reports the pool. Results are only announced through the callback.

pub mod api;
pub mod config;
pub mod error;
pub mod jobs;
pub mod notify;
pub mod render;
pub mod state;
pub mod storage;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use state::AppState;
use tower_http::trace::TraceLayer;

pub use error::{JobError, QueueError, ServiceError};

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        .route("/health", get(api::health_check))
        .route("/api/v1/jobs", post(api::submit_job))
        .route("/files/*key", get(api::download_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
