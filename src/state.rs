use crate::config::Config;
use crate::jobs::JobQueue;
use crate::storage::Storage;
use std::sync::Arc;

/// Shared application state accessible to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Bounded worker pool behind `POST /api/v1/jobs`
    pub job_queue: Arc<JobQueue>,

    /// Finished documents, also served under `/files`
    pub storage: Arc<dyn Storage>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(job_queue: Arc<JobQueue>, storage: Arc<dyn Storage>, config: Config) -> Self {
        Self {
            job_queue,
            storage,
            config: Arc::new(config),
        }
    }
}
