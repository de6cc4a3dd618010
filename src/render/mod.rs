//! Output collaborators.
//!
//! Handlers hand these fully paginated or aggregated data; turning that into
//! bytes is the renderer's only job. The built-in implementations produce
//! print-ready HTML rosters and JSON workbooks. A PDF printer or an xlsx
//! writer plugs in behind the same traits.

pub mod html;
pub mod json_writer;
pub mod workbook;

use crate::error::RenderError;
use async_trait::async_trait;
use rollbook_types::{MemberRecord, Page};

pub use html::HtmlRosterRenderer;
pub use json_writer::JsonWorkbookWriter;
pub use workbook::{Cell, Sheet, Workbook, roster_workbook, statistics_workbook};

/// Bytes produced for one job, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    /// File extension without the dot.
    pub extension: &'static str,
}

/// Turns laid-out roster pages into a paginated document.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render_roster(
        &self,
        title: &str,
        pages: &[Page<MemberRecord>],
    ) -> Result<RenderedDocument, RenderError>;
}

/// Serializes a workbook into its file format.
#[async_trait]
pub trait WorkbookWriter: Send + Sync {
    async fn write(&self, workbook: &Workbook) -> Result<RenderedDocument, RenderError>;
}
