use serde::{Deserialize, Serialize};

/// Body of the completion callback.
///
/// `url` is set on success and `error` on failure; the other is omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub success: bool,
    pub job_id: String,
    #[serde(rename = "type")]
    pub job_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WebhookPayload {
    pub fn completed(job_id: impl Into<String>, job_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            success: true,
            job_id: job_id.into(),
            job_type: job_type.into(),
            url: Some(url.into()),
            error: None,
        }
    }

    pub fn failed(job_id: impl Into<String>, job_type: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            job_id: job_id.into(),
            job_type: job_type.into(),
            url: None,
            error: Some(error.into()),
        }
    }

    /// The exact bytes that are posted and signed.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body_shape() {
        let payload = WebhookPayload::completed("ckabc", "report-with-pagination", "/files/a.html");
        let body = String::from_utf8(payload.to_bytes().unwrap()).unwrap();
        assert_eq!(
            body,
            r#"{"success":true,"jobId":"ckabc","type":"report-with-pagination","url":"/files/a.html"}"#
        );
    }

    #[test]
    fn test_failure_body_shape() {
        let payload = WebhookPayload::failed("ckabc", "report-with-statistics", "No ballot rows to summarize.");
        let body = String::from_utf8(payload.to_bytes().unwrap()).unwrap();
        assert_eq!(
            body,
            r#"{"success":false,"jobId":"ckabc","type":"report-with-statistics","error":"No ballot rows to summarize."}"#
        );
    }
}
