use crate::error::QueueError;
use rollbook_layout::config::MIN_PAGE_CAPACITY;
use rollbook_stats::Dimension;
use rollbook_types::{BallotRecord, MemberRecord};
use serde::{Deserialize, Serialize};

/// Job type tag, as sent in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobKind {
    #[serde(rename = "report-with-pagination")]
    Roster,
    #[serde(rename = "report-with-statistics")]
    Statistics,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Roster => "report-with-pagination",
            JobKind::Statistics => "report-with-statistics",
        }
    }

    pub fn parse(raw: &str) -> Option<JobKind> {
        match raw {
            "report-with-pagination" => Some(JobKind::Roster),
            "report-with-statistics" => Some(JobKind::Statistics),
            _ => None,
        }
    }

    /// Path segment under which outputs of this kind are stored.
    pub fn report_segment(&self) -> &'static str {
        match self {
            JobKind::Roster => "committee-roster",
            JobKind::Statistics => "ballot-statistics",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    PaginatedDocument,
    Workbook,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::PaginatedDocument => "paginated-document",
            OutputFormat::Workbook => "workbook",
        }
    }

    pub fn parse(raw: &str) -> Option<OutputFormat> {
        match raw {
            "paginated-document" => Some(OutputFormat::PaginatedDocument),
            "workbook" => Some(OutputFormat::Workbook),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPayload {
    pub title: String,
    pub members: Vec<MemberRecord>,
    /// Overrides the configured page capacity for this job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_capacity: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsPayload {
    pub title: String,
    pub rows: Vec<BallotRecord>,
    /// Empty means every dimension.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Dimension>,
    /// Overrides the configured required columns for this job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_columns: Option<Vec<String>>,
}

/// Type-specific job data, tagged by [`JobKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum JobPayload {
    Roster(RosterPayload),
    Statistics(StatisticsPayload),
}

impl JobPayload {
    pub fn kind(&self) -> JobKind {
        match self {
            JobPayload::Roster(_) => JobKind::Roster,
            JobPayload::Statistics(_) => JobKind::Statistics,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            JobPayload::Roster(p) => &p.title,
            JobPayload::Statistics(p) => &p.title,
        }
    }

    /// Number of input records carried.
    pub fn record_count(&self) -> usize {
        match self {
            JobPayload::Roster(p) => p.members.len(),
            JobPayload::Statistics(p) => p.rows.len(),
        }
    }
}

/// An accepted job. Immutable once submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub job_id: String,
    pub payload: JobPayload,
    pub author: String,
    pub format: OutputFormat,
}

impl Job {
    pub fn kind(&self) -> JobKind {
        self.payload.kind()
    }

    /// Checks everything about the job that does not depend on which handlers
    /// are registered.
    pub fn validate(&self) -> Result<(), QueueError> {
        if !is_cuid(&self.job_id) {
            return Err(QueueError::InvalidJobId(self.job_id.clone()));
        }
        if self.author.trim().is_empty() {
            return Err(QueueError::BlankAuthor);
        }
        if self.payload.record_count() == 0 {
            return Err(QueueError::EmptyPayload);
        }
        match &self.payload {
            JobPayload::Roster(RosterPayload {
                page_capacity: Some(cap),
                ..
            }) if *cap < MIN_PAGE_CAPACITY => Err(QueueError::PageCapacity {
                min: MIN_PAGE_CAPACITY,
                got: *cap,
            }),
            JobPayload::Statistics(StatisticsPayload {
                required_columns: Some(columns),
                ..
            }) => {
                let known = BallotRecord::default();
                match columns.iter().find(|c| known.column(c).is_none()) {
                    Some(column) => Err(QueueError::UnknownColumn(column.clone())),
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }
}

/// Submission body as it arrives on the wire.
///
/// `type` and `format` stay strings here so that an unknown tag is reported
/// as a rejection of that tag rather than as a generic parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub job_id: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub payload: serde_json::Value,
    pub author: String,
    pub format: String,
}

/// Why a [`JobRequest`] could not become a [`Job`].
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Rejected(#[from] QueueError),

    #[error("Unknown output format '{0}'")]
    UnknownFormat(String),

    #[error("Invalid '{kind}' payload: {source}")]
    Payload {
        kind: JobKind,
        source: serde_json::Error,
    },
}

impl TryFrom<JobRequest> for Job {
    type Error = RequestError;

    fn try_from(request: JobRequest) -> Result<Self, Self::Error> {
        let kind = JobKind::parse(&request.job_type)
            .ok_or_else(|| QueueError::UnknownJobType(request.job_type.clone()))?;
        let format = OutputFormat::parse(&request.format)
            .ok_or_else(|| RequestError::UnknownFormat(request.format.clone()))?;

        let payload = match kind {
            JobKind::Roster => serde_json::from_value(request.payload).map(JobPayload::Roster),
            JobKind::Statistics => {
                serde_json::from_value(request.payload).map(JobPayload::Statistics)
            }
        }
        .map_err(|source| RequestError::Payload { kind, source })?;

        Ok(Job {
            job_id: request.job_id,
            payload,
            author: request.author,
            format,
        })
    }
}

/// CUID-style id: a lowercase letter followed by 23 to 31 lowercase
/// alphanumerics. Covers both CUID (25 chars) and CUID2 (24-32 chars).
pub fn is_cuid(id: &str) -> bool {
    let bytes = id.as_bytes();
    let Some((first, rest)) = bytes.split_first() else {
        return false;
    };
    first.is_ascii_lowercase()
        && (23..=31).contains(&rest.len())
        && rest
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}
