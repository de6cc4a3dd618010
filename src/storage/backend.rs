use crate::error::StorageError;
use crate::render::RenderedDocument;
use async_trait::async_trait;

/// Destination of finished documents.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stores `document` under `key` and returns the URL it can be fetched from.
    async fn put(&self, key: &str, document: &RenderedDocument) -> Result<String, StorageError>;

    /// Reads back a stored object.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;
}
