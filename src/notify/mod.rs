//! Completion callbacks.

pub mod delivery;

pub use delivery::{CallbackRequest, HttpDelivery, WebhookDelivery};

use rollbook_webhook::{WebhookPayload, sign};
use std::sync::Arc;

/// Signs and sends completion callbacks through a [`WebhookDelivery`].
///
/// Delivery failures are logged and dropped; they never reach the job or the
/// submitter.
pub struct Notifier {
    url: Option<String>,
    secret: Option<String>,
    delivery: Arc<dyn WebhookDelivery>,
}

impl Notifier {
    pub fn new(
        url: Option<String>,
        secret: Option<String>,
        delivery: Arc<dyn WebhookDelivery>,
    ) -> Self {
        Self {
            url: url.filter(|u| !u.trim().is_empty()),
            secret: secret.filter(|s| !s.is_empty()),
            delivery,
        }
    }

    pub fn is_signing(&self) -> bool {
        self.secret.is_some()
    }

    /// Serializes `payload` once and signs those bytes.
    pub fn prepare(&self, url: &str, payload: &WebhookPayload) -> serde_json::Result<CallbackRequest> {
        let body = payload.to_bytes()?;
        let signature = self.secret.as_deref().map(|secret| sign(&body, secret));
        Ok(CallbackRequest {
            url: url.to_string(),
            body,
            signature,
        })
    }

    pub async fn notify(&self, payload: &WebhookPayload) {
        let Some(url) = self.url.as_deref() else {
            tracing::info!(
                "No callback URL configured; job {} finished (success: {})",
                payload.job_id,
                payload.success
            );
            return;
        };

        let request = match self.prepare(url, payload) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("Callback for job {} not serialized: {}", payload.job_id, e);
                return;
            }
        };

        match self.delivery.deliver(&request).await {
            Ok(()) => tracing::info!(
                "Callback for job {} delivered (success: {}, signed: {})",
                payload.job_id,
                payload.success,
                request.signature.is_some()
            ),
            Err(e) => tracing::warn!("Callback for job {} failed: {}", payload.job_id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeliveryError;
    use async_trait::async_trait;
    use rollbook_webhook::verify;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<CallbackRequest>>,
    }

    #[async_trait]
    impl WebhookDelivery for Recorder {
        async fn deliver(&self, request: &CallbackRequest) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(request.clone());
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl WebhookDelivery for Failing {
        async fn deliver(&self, _request: &CallbackRequest) -> Result<(), DeliveryError> {
            let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
            Err(DeliveryError::Serialization(err))
        }
    }

    fn payload() -> WebhookPayload {
        WebhookPayload::completed("ckv9x2m4p0000a8z3h1q6d7rt", "report-with-pagination", "/files/a.html")
    }

    #[tokio::test]
    async fn test_signs_exact_body_bytes() {
        let recorder = Arc::new(Recorder::default());
        let notifier = Notifier::new(
            Some("http://hooks.local/done".into()),
            Some("s3cret".into()),
            recorder.clone(),
        );
        notifier.notify(&payload()).await;

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let request = &sent[0];
        assert_eq!(request.url, "http://hooks.local/done");
        let signature = request.signature.as_deref().unwrap();
        assert!(verify(&request.body, "s3cret", signature));
        assert_eq!(request.body, payload().to_bytes().unwrap());
    }

    #[tokio::test]
    async fn test_no_secret_means_no_signature() {
        let recorder = Arc::new(Recorder::default());
        let notifier = Notifier::new(Some("http://hooks.local/done".into()), Some(String::new()), recorder.clone());
        assert!(!notifier.is_signing());
        notifier.notify(&payload()).await;
        assert_eq!(recorder.sent.lock().unwrap()[0].signature, None);
    }

    #[tokio::test]
    async fn test_no_url_skips_delivery() {
        let recorder = Arc::new(Recorder::default());
        let notifier = Notifier::new(None, Some("s".into()), recorder.clone());
        notifier.notify(&payload()).await;
        assert!(recorder.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        let notifier = Notifier::new(Some("http://hooks.local/done".into()), None, Arc::new(Failing));
        notifier.notify(&payload()).await;
    }
}
