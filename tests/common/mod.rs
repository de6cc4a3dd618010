#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use flate2::{Compression, write::GzEncoder};
use rollbook::config::Config;
use rollbook::error::{DeliveryError, JobError, RenderError};
use rollbook::jobs::{
    HandlerRegistry, Job, JobHandler, JobKind, JobQueue, JobRuntime, OutputFormat,
};
use rollbook::notify::{CallbackRequest, Notifier, WebhookDelivery};
use rollbook::render::RenderedDocument;
use rollbook::storage::{FilesystemStorage, Storage};
use rollbook_webhook::WebhookPayload;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::{Semaphore, mpsc};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const SECRET: &str = "test-secret";
pub const CALLBACK_URL: &str = "http://callbacks.test/jobs";

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("rollbook=debug")
        .try_init();
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("write to Vec");
    encoder.finish().expect("finish gzip")
}

/// Captures callbacks instead of posting them.
pub struct RecordingDelivery {
    sender: mpsc::UnboundedSender<CallbackRequest>,
}

impl RecordingDelivery {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<CallbackRequest>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { sender }), receiver)
    }
}

#[async_trait]
impl WebhookDelivery for RecordingDelivery {
    async fn deliver(&self, request: &CallbackRequest) -> Result<(), DeliveryError> {
        let _ = self.sender.send(request.clone());
        Ok(())
    }
}

/// Waits for the next callback and decodes its payload.
pub async fn next_callback(
    receiver: &mut mpsc::UnboundedReceiver<CallbackRequest>,
) -> (CallbackRequest, WebhookPayload) {
    let request = tokio::time::timeout(Duration::from_secs(10), receiver.recv())
        .await
        .expect("callback within timeout")
        .expect("delivery channel open");
    let payload = serde_json::from_slice(&request.body).expect("callback body is a payload");
    (request, payload)
}

/// Roster-kind handler that records how jobs are scheduled.
///
/// Authors steer the outcome: `"fail"` returns an error, `"panic"` panics,
/// anything else succeeds after `delay`. With a gate, every job waits for a
/// permit before finishing.
pub struct ScriptedHandler {
    pub delay: Duration,
    pub gate: Option<Arc<Semaphore>>,
    pub started: mpsc::UnboundedSender<String>,
    current: AtomicUsize,
    pub peak: AtomicUsize,
}

impl ScriptedHandler {
    pub fn new(delay: Duration, gate: Option<Arc<Semaphore>>) -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (started, receiver) = mpsc::unbounded_channel();
        let handler = Self {
            delay,
            gate,
            started,
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        };
        (Arc::new(handler), receiver)
    }
}

#[async_trait]
impl JobHandler for ScriptedHandler {
    fn kind(&self) -> JobKind {
        JobKind::Roster
    }

    fn supports(&self, _format: OutputFormat) -> bool {
        true
    }

    async fn handle(&self, job: &Job) -> Result<RenderedDocument, JobError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _ = self.started.send(job.job_id.clone());

        tokio::time::sleep(self.delay).await;
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate open").forget();
        }
        self.current.fetch_sub(1, Ordering::SeqCst);

        match job.author.as_str() {
            "fail" => Err(RenderError::Workbook("boom".into()).into()),
            "panic" => panic!("handler exploded"),
            _ => Ok(RenderedDocument {
                bytes: job.job_id.as_bytes().to_vec(),
                content_type: "text/plain",
                extension: "txt",
            }),
        }
    }
}

/// A running queue with filesystem storage in a temporary directory.
pub struct TestQueue {
    pub queue: Arc<JobQueue>,
    pub storage: Arc<dyn Storage>,
    pub dir: TempDir,
}

pub async fn start_queue(
    concurrency: usize,
    registry: HandlerRegistry,
    delivery: Arc<dyn WebhookDelivery>,
    secret: Option<&str>,
) -> TestQueue {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage: Arc<dyn Storage> = Arc::new(
        FilesystemStorage::new(dir.path().to_path_buf(), "/files")
            .await
            .expect("storage"),
    );
    let notifier = Notifier::new(
        Some(CALLBACK_URL.to_string()),
        secret.map(String::from),
        delivery,
    );
    let queue = JobQueue::start(
        concurrency,
        registry,
        JobRuntime {
            storage: storage.clone(),
            notifier: Arc::new(notifier),
        },
    );
    TestQueue {
        queue: Arc::new(queue),
        storage,
        dir,
    }
}

pub fn test_config(storage_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.storage.path = storage_dir.to_path_buf();
    config
}
