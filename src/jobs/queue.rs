use crate::error::QueueError;
use crate::jobs::models::Job;
use crate::jobs::registry::HandlerRegistry;
use crate::jobs::worker::Worker;
use crate::notify::Notifier;
use crate::storage::Storage;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Collaborators every job needs after its handler has run.
#[derive(Clone)]
pub struct JobRuntime {
    pub storage: Arc<dyn Storage>,
    pub notifier: Arc<Notifier>,
}

/// In-memory FIFO queue drained by a fixed pool of workers.
///
/// Depth is unbounded; only the number of jobs running at once is limited.
/// Nothing is persisted, so queued and running jobs are lost on exit.
pub struct JobQueue {
    sender: async_channel::Sender<Job>,
    registry: Arc<HandlerRegistry>,
    concurrency: usize,
    running: Arc<AtomicUsize>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl JobQueue {
    /// Spawns `concurrency` workers (at least one) on the current Tokio runtime.
    pub fn start(concurrency: usize, registry: HandlerRegistry, runtime: JobRuntime) -> Self {
        let concurrency = concurrency.max(1);
        let (sender, receiver) = async_channel::unbounded::<Job>();
        let registry = Arc::new(registry);
        let running = Arc::new(AtomicUsize::new(0));

        tracing::info!("Spawning {} job workers", concurrency);
        let workers = (0..concurrency)
            .map(|id| {
                let worker = Worker {
                    id,
                    receiver: receiver.clone(),
                    registry: Arc::clone(&registry),
                    runtime: runtime.clone(),
                    running: Arc::clone(&running),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        Self {
            sender,
            registry,
            concurrency,
            running,
            workers: Mutex::new(workers),
        }
    }

    /// Validates and enqueues `job` without waiting for a worker.
    ///
    /// Returns the number of jobs that were waiting before this one.
    pub fn submit(&self, job: Job) -> Result<usize, QueueError> {
        self.registry.validate(&job)?;

        let depth = self.sender.len();
        let job_id = job.job_id.clone();
        let kind = job.kind();
        self.sender.try_send(job).map_err(|_| QueueError::Closed)?;

        tracing::info!(
            "Job {} ({}) enqueued behind {} waiting jobs",
            job_id,
            kind,
            depth
        );
        Ok(depth)
    }

    /// Jobs waiting for a worker.
    pub fn pending(&self) -> usize {
        self.sender.len()
    }

    /// Jobs currently executing.
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Stops accepting jobs, lets the workers drain what is already queued,
    /// and waits for them to exit.
    pub async fn shutdown(&self) {
        self.sender.close();
        let workers = std::mem::take(&mut *self.workers.lock().await);
        tracing::info!(
            "Job queue closed; waiting for {} workers to drain {} jobs",
            workers.len(),
            self.pending()
        );
        for handle in workers {
            if let Err(e) = handle.await {
                tracing::warn!("Worker exited abnormally: {}", e);
            }
        }
    }
}
