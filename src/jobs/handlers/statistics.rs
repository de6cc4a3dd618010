use crate::error::{JobError, RenderError};
use crate::jobs::models::{Job, JobKind, JobPayload, OutputFormat};
use crate::jobs::registry::JobHandler;
use crate::render::{RenderedDocument, WorkbookWriter, statistics_workbook};
use async_trait::async_trait;
use rollbook_stats::StatisticsReport;
use std::sync::Arc;

/// Absentee-ballot statistics workbooks.
pub struct StatisticsHandler {
    required_columns: Vec<String>,
    writer: Arc<dyn WorkbookWriter>,
}

impl StatisticsHandler {
    pub fn new(required_columns: Vec<String>, writer: Arc<dyn WorkbookWriter>) -> Self {
        Self {
            required_columns,
            writer,
        }
    }
}

#[async_trait]
impl JobHandler for StatisticsHandler {
    fn kind(&self) -> JobKind {
        JobKind::Statistics
    }

    fn supports(&self, format: OutputFormat) -> bool {
        format == OutputFormat::Workbook
    }

    async fn handle(&self, job: &Job) -> Result<RenderedDocument, JobError> {
        let JobPayload::Statistics(payload) = &job.payload else {
            return Err(JobError::WrongPayload {
                handler: self.kind().to_string(),
                got: job.kind().to_string(),
            });
        };
        if job.format != OutputFormat::Workbook {
            return Err(RenderError::UnsupportedFormat("paginated-document").into());
        }

        let required = payload
            .required_columns
            .as_deref()
            .unwrap_or(&self.required_columns);
        let report = StatisticsReport::build(&payload.rows, &payload.dimensions, required)?;

        tracing::debug!(
            "Job {}: {} rows, {} dimensions, {} return days",
            job.job_id,
            payload.rows.len(),
            report.dimensions.len(),
            report.daily_returns.len()
        );

        let workbook = statistics_workbook(&payload.title, &report)?;
        Ok(self.writer.write(&workbook).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::models::StatisticsPayload;
    use crate::render::JsonWorkbookWriter;
    use rollbook_stats::{Dimension, StatsError};
    use rollbook_types::BallotRecord;

    fn job(rows: Vec<BallotRecord>, dimensions: Vec<Dimension>, required: Option<Vec<String>>) -> Job {
        Job {
            job_id: "ckv9x2m4p0000a8z3h1q6d7rt".into(),
            payload: JobPayload::Statistics(StatisticsPayload {
                title: "Absentee".into(),
                rows,
                dimensions,
                required_columns: required,
            }),
            author: "Pat".into(),
            format: OutputFormat::Workbook,
        }
    }

    fn handler() -> StatisticsHandler {
        StatisticsHandler::new(vec!["ward".into(), "party".into()], Arc::new(JsonWorkbookWriter))
    }

    fn ballot(ward: &str, party: &str) -> BallotRecord {
        BallotRecord {
            ward: Some(ward.into()),
            party: Some(party.into()),
            date_sent: Some("2024-10-01".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_selected_dimensions_only() {
        let doc = handler()
            .handle(&job(vec![ballot("45", "DEM")], vec![Dimension::Town], None))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&doc.bytes).unwrap();
        let names: Vec<&str> = value["sheets"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Summary", "Town", "Daily Returns"]);
    }

    #[tokio::test]
    async fn test_quality_gate_uses_configured_columns() {
        let rows = vec![BallotRecord {
            ward: Some("45".into()),
            ..Default::default()
        }];
        let err = handler().handle(&job(rows.clone(), vec![], None)).await.unwrap_err();
        assert!(matches!(err, JobError::Stats(StatsError::MissingColumn(ref c)) if c == "party"));

        // A payload override replaces the configured list.
        let doc = handler()
            .handle(&job(rows, vec![], Some(vec!["ward".into()])))
            .await;
        assert!(doc.is_ok());
    }

    #[tokio::test]
    async fn test_empty_rows_fail() {
        let err = handler().handle(&job(vec![], vec![], None)).await.unwrap_err();
        assert!(matches!(err, JobError::Stats(StatsError::EmptyInput)));
    }
}
