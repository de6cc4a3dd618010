use crate::error::StorageError;
use crate::render::RenderedDocument;
use crate::storage::backend::Storage;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Stores objects as files below a base directory, keyed by relative path.
pub struct FilesystemStorage {
    base_path: PathBuf,
    public_base_url: String,
}

impl FilesystemStorage {
    pub async fn new(base_path: PathBuf, public_base_url: impl Into<String>) -> Result<Self, StorageError> {
        tokio::fs::create_dir_all(&base_path).await?;
        Ok(Self {
            base_path,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Maps a key to a path under the base directory. Only plain relative
    /// segments are accepted.
    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let plain = !key.is_empty()
            && !key.contains('\\')
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl Storage for FilesystemStorage {
    async fn put(&self, key: &str, document: &RenderedDocument) -> Result<String, StorageError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &document.bytes).await?;

        tracing::debug!("Stored {} bytes at {}", document.bytes.len(), path.display());
        Ok(format!("{}/{}", self.public_base_url, key))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
