use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rollbook_layout::LayoutError;
use rollbook_stats::StatsError;
use serde_json::json;

/// Reasons a job is refused before it enters the queue.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("Job id '{0}' is not a valid CUID")]
    InvalidJobId(String),

    #[error("Author must not be blank")]
    BlankAuthor,

    #[error("Job payload is empty")]
    EmptyPayload,

    #[error("Page capacity must be at least {min}, got {got}")]
    PageCapacity { min: usize, got: usize },

    #[error("Unknown required column '{0}'")]
    UnknownColumn(String),

    #[error("No handler registered for job type '{0}'")]
    UnknownJobType(String),

    #[error("Job type '{kind}' cannot produce format '{format}'")]
    UnsupportedFormat { kind: String, format: String },

    #[error("Job queue is shut down")]
    Closed,
}

/// Failure of a running job. The `Display` text is the `error` field of the
/// failure callback.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Statistics failed: {0}")]
    Stats(#[from] StatsError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Upload failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No handler registered for job type '{0}'")]
    NoHandler(String),

    #[error("Handler for '{handler}' was given a '{got}' payload")]
    WrongPayload { handler: String, got: String },

    #[error("Job panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{0} output is not supported by this renderer")]
    UnsupportedFormat(&'static str),

    #[error("Invalid workbook: {0}")]
    Workbook(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Object '{0}' not found")]
    NotFound(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Callback request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Callback could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors surfaced by the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Job rejected: {0}")]
    Rejected(#[from] QueueError),

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "InvalidRequest", self.to_string()),
            Self::Rejected(QueueError::Closed) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "QueueClosed",
                self.to_string(),
            ),
            Self::Rejected(_) => (StatusCode::BAD_REQUEST, "JobRejected", self.to_string()),
            Self::PayloadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PayloadTooLarge",
                self.to_string(),
            ),
            Self::Storage(StorageError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "NotFound", "Not found".to_string())
            }
            Self::Storage(StorageError::InvalidKey(_)) => {
                (StatusCode::BAD_REQUEST, "InvalidRequest", self.to_string())
            }
            Self::Storage(_) | Self::Internal(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
