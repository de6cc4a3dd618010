use crate::error::JobError;
use crate::jobs::models::Job;
use crate::jobs::queue::JobRuntime;
use crate::jobs::registry::HandlerRegistry;
use crate::storage::{Storage, object_key};
use rollbook_webhook::WebhookPayload;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::task::JoinError;

/// One execution slot. Takes a job, runs it to completion, sends its
/// callback, then takes the next.
pub(crate) struct Worker {
    pub(crate) id: usize,
    pub(crate) receiver: async_channel::Receiver<Job>,
    pub(crate) registry: Arc<HandlerRegistry>,
    pub(crate) runtime: JobRuntime,
    pub(crate) running: Arc<AtomicUsize>,
}

impl Worker {
    pub(crate) async fn run(self) {
        tracing::info!("[WORKER-{}] Started.", self.id);
        while let Ok(job) = self.receiver.recv().await {
            self.running.fetch_add(1, Ordering::SeqCst);
            self.process(job).await;
            self.running.fetch_sub(1, Ordering::SeqCst);
        }
        tracing::info!("[WORKER-{}] Queue closed, shutting down.", self.id);
    }

    async fn process(&self, job: Job) {
        let job = Arc::new(job);
        let kind = job.kind();
        let started = Instant::now();
        tracing::info!(
            "[WORKER-{}] Processing job {} ({}, {} records, by {})",
            self.id,
            job.job_id,
            kind,
            job.payload.record_count(),
            job.author
        );

        // A separate task keeps a panicking handler from taking the worker down.
        let task = {
            let job = Arc::clone(&job);
            let registry = Arc::clone(&self.registry);
            let storage = Arc::clone(&self.runtime.storage);
            tokio::spawn(async move { execute(&registry, storage.as_ref(), &job).await })
        };
        let outcome = task.await.unwrap_or_else(|e| Err(JobError::Panicked(panic_message(e))));

        let payload = match outcome {
            Ok(url) => {
                tracing::info!(
                    "[WORKER-{}] Job {} completed in {:?}: {}",
                    self.id,
                    job.job_id,
                    started.elapsed(),
                    url
                );
                WebhookPayload::completed(&job.job_id, kind.as_str(), url)
            }
            Err(e) => {
                tracing::warn!(
                    "[WORKER-{}] Job {} failed after {:?}: {}",
                    self.id,
                    job.job_id,
                    started.elapsed(),
                    e
                );
                WebhookPayload::failed(&job.job_id, kind.as_str(), e.to_string())
            }
        };

        self.runtime.notifier.notify(&payload).await;
    }
}

/// Handler, then upload. Returns the public URL of the stored document.
async fn execute(registry: &HandlerRegistry, storage: &dyn Storage, job: &Job) -> Result<String, JobError> {
    let kind = job.kind();
    let handler = registry
        .get(kind)
        .ok_or_else(|| JobError::NoHandler(kind.to_string()))?;
    let document = handler.handle(job).await?;
    let key = object_key(&job.author, kind, &job.job_id, document.extension);
    Ok(storage.put(&key, &document).await?)
}

fn panic_message(error: JoinError) -> String {
    if !error.is_panic() {
        return "task cancelled".to_string();
    }
    let panic = error.into_panic();
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
