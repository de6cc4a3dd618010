use super::{RenderedDocument, Workbook, WorkbookWriter};
use crate::error::RenderError;
use async_trait::async_trait;

/// Writes a workbook as pretty-printed JSON, one object per sheet.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonWorkbookWriter;

#[async_trait]
impl WorkbookWriter for JsonWorkbookWriter {
    async fn write(&self, workbook: &Workbook) -> Result<RenderedDocument, RenderError> {
        Ok(RenderedDocument {
            bytes: serde_json::to_vec_pretty(workbook)?,
            content_type: "application/json",
            extension: "json",
        })
    }
}
