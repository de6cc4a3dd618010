use crate::error::DeliveryError;
use async_trait::async_trait;
use rollbook_webhook::SIGNATURE_HEADER;
use std::time::Duration;

/// One outbound callback, fully prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackRequest {
    pub url: String,
    /// Serialized payload; the signature covers exactly these bytes.
    pub body: Vec<u8>,
    /// `sha256=<hex>` value, `None` when no secret is configured.
    pub signature: Option<String>,
}

/// How a callback reaches the receiver.
#[async_trait]
pub trait WebhookDelivery: Send + Sync {
    async fn deliver(&self, request: &CallbackRequest) -> Result<(), DeliveryError>;
}

/// A single HTTP POST per callback, without retries.
pub struct HttpDelivery {
    client: reqwest::Client,
}

impl HttpDelivery {
    pub fn new(timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookDelivery for HttpDelivery {
    async fn deliver(&self, request: &CallbackRequest) -> Result<(), DeliveryError> {
        let mut builder = self
            .client
            .post(&request.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(request.body.clone());
        if let Some(signature) = &request.signature {
            builder = builder.header(SIGNATURE_HEADER, signature);
        }

        builder.send().await?.error_for_status()?;
        Ok(())
    }
}
