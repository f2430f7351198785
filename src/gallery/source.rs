use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::trace;

use crate::error::BoxError;

/// Where the gallery reads its manifest from.
///
/// Fetching has no retry and no timeout; a fetch that never resolves leaves
/// its page pending.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>, BoxError>;
}

/// Manifest stored on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileManifestSource {
    path: PathBuf,
}

impl FileManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ManifestSource for FileManifestSource {
    async fn fetch(&self) -> Result<Vec<u8>, BoxError> {
        trace!(path = ?self.path, "reading manifest");
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(bytes)
    }
}

/// Manifest held in memory.
#[derive(Debug, Clone)]
pub struct StaticManifestSource {
    bytes: Vec<u8>,
}

impl StaticManifestSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
impl ManifestSource for StaticManifestSource {
    async fn fetch(&self) -> Result<Vec<u8>, BoxError> {
        Ok(self.bytes.clone())
    }
}
