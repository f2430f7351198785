//! Error types for the layout engine and the gallery controller.

use thiserror::Error;

/// Boxed error returned by manifest sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum LayoutError {
    /// Bad construction arguments. The engine does not run.
    #[error("invalid layout configuration: {0}")]
    Configuration(String),

    /// A required host resource (the container) is absent.
    #[error("layout resource missing: {0}")]
    ResourceMissing(&'static str),
}

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("failed to fetch manifest: {0}")]
    Fetch(#[source] BoxError),

    #[error("malformed manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("album not found: {0}")]
    AlbumNotFound(String),
}
