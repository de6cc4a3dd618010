use crate::error::JobError;
use crate::jobs::models::{Job, JobKind, JobPayload, OutputFormat};
use crate::jobs::registry::JobHandler;
use crate::render::{DocumentRenderer, RenderedDocument, WorkbookWriter, roster_workbook};
use async_trait::async_trait;
use rollbook_layout::{
    LayoutConfig, paginate, section_totals, sections_from_members, verify_section_totals,
};
use std::sync::Arc;

/// Committee rosters: sectioned by LD, grouped by ED, paginated, then
/// rendered as a document or written as one sheet per section.
pub struct RosterHandler {
    layout: LayoutConfig,
    renderer: Arc<dyn DocumentRenderer>,
    writer: Arc<dyn WorkbookWriter>,
}

impl RosterHandler {
    pub fn new(
        layout: LayoutConfig,
        renderer: Arc<dyn DocumentRenderer>,
        writer: Arc<dyn WorkbookWriter>,
    ) -> Self {
        Self {
            layout,
            renderer,
            writer,
        }
    }
}

#[async_trait]
impl JobHandler for RosterHandler {
    fn kind(&self) -> JobKind {
        JobKind::Roster
    }

    fn supports(&self, format: OutputFormat) -> bool {
        matches!(format, OutputFormat::PaginatedDocument | OutputFormat::Workbook)
    }

    async fn handle(&self, job: &Job) -> Result<RenderedDocument, JobError> {
        let JobPayload::Roster(payload) = &job.payload else {
            return Err(JobError::WrongPayload {
                handler: self.kind().to_string(),
                got: job.kind().to_string(),
            });
        };

        let layout = match payload.page_capacity {
            Some(capacity) => LayoutConfig::new(capacity)?,
            None => self.layout,
        };

        let sections = sections_from_members(payload.members.clone());
        let expected = section_totals(&sections);
        let pages = paginate(sections, &layout);
        verify_section_totals(&expected, &pages, &layout)?;

        tracing::debug!(
            "Job {}: {} members in {} sections on {} pages (capacity {})",
            job.job_id,
            payload.members.len(),
            expected.len(),
            pages.len(),
            layout.page_capacity()
        );

        let document = match job.format {
            OutputFormat::PaginatedDocument => {
                self.renderer.render_roster(&payload.title, &pages).await?
            }
            OutputFormat::Workbook => {
                let workbook = roster_workbook(&payload.title, &pages)?;
                self.writer.write(&workbook).await?
            }
        };
        Ok(document)
    }
}
