use crate::error::{JobError, QueueError};
use crate::jobs::handlers::{RosterHandler, StatisticsHandler};
use crate::jobs::models::{Job, JobKind, OutputFormat};
use crate::render::{
    DocumentRenderer, HtmlRosterRenderer, JsonWorkbookWriter, RenderedDocument, WorkbookWriter,
};
use async_trait::async_trait;
use rollbook_layout::LayoutConfig;
use std::collections::HashMap;
use std::sync::Arc;

/// Produces the document for one job type.
#[async_trait]
pub trait JobHandler: Send + Sync {
    fn kind(&self) -> JobKind;

    fn supports(&self, format: OutputFormat) -> bool;

    async fn handle(&self, job: &Job) -> Result<RenderedDocument, JobError>;
}

/// Handlers keyed by job type. Consulted at submission, so a job the
/// service cannot run never enters the queue.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<JobKind, Arc<dyn JobHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster and statistics handlers with the built-in HTML renderer and
    /// JSON workbook writer.
    pub fn with_defaults(layout: LayoutConfig, required_columns: Vec<String>) -> Self {
        let renderer: Arc<dyn DocumentRenderer> = Arc::new(HtmlRosterRenderer);
        let writer: Arc<dyn WorkbookWriter> = Arc::new(JsonWorkbookWriter);

        let mut registry = Self::new();
        registry.register(Arc::new(RosterHandler::new(
            layout,
            renderer,
            writer.clone(),
        )));
        registry.register(Arc::new(StatisticsHandler::new(required_columns, writer)));
        registry
    }

    /// Adds `handler` under its kind, returning the handler it replaced.
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) -> Option<Arc<dyn JobHandler>> {
        self.handlers.insert(handler.kind(), handler)
    }

    pub fn get(&self, kind: JobKind) -> Option<Arc<dyn JobHandler>> {
        self.handlers.get(&kind).cloned()
    }

    pub fn kinds(&self) -> Vec<JobKind> {
        self.handlers.keys().copied().collect()
    }

    /// Full submission check: the job itself, then handler and format.
    pub fn validate(&self, job: &Job) -> Result<Arc<dyn JobHandler>, QueueError> {
        job.validate()?;
        let kind = job.kind();
        let handler = self
            .get(kind)
            .ok_or_else(|| QueueError::UnknownJobType(kind.as_str().to_string()))?;
        if !handler.supports(job.format) {
            return Err(QueueError::UnsupportedFormat {
                kind: kind.as_str().to_string(),
                format: job.format.as_str().to_string(),
            });
        }
        Ok(handler)
    }
}
