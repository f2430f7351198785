use std::sync::Arc;

use tracing::{info, warn};

use super::lightbox::Lightbox;
use super::source::ManifestSource;
use crate::decode::ImageSource;
use crate::error::GalleryError;
use crate::layout::LayoutItem;
use crate::manifest::{Manifest, ManifestImage};
use crate::models::GalleryItem;

/// One album shown on its own page, in manifest order.
#[derive(Debug, Clone)]
pub struct AlbumPage {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cover: String,
    pub items: Arc<Vec<GalleryItem>>,
}

impl AlbumPage {
    pub fn layout_items(&self, images: &dyn ImageSource) -> Vec<LayoutItem> {
        self.items
            .iter()
            .map(|item| LayoutItem::image(item.id.clone(), images.request(&item.thumbnail_url)))
            .collect()
    }

    pub fn lightbox(&self) -> Lightbox {
        Lightbox::new(Arc::clone(&self.items))
    }
}

/// Loads the album `id` from the manifest.
pub async fn load_album(source: &dyn ManifestSource, id: &str) -> Result<AlbumPage, GalleryError> {
    let result = fetch_album(source, id).await;
    match &result {
        Ok(page) => info!(album = id, images = page.items.len(), "loaded album"),
        Err(err) => warn!(album = id, error = %err, "failed to load album"),
    }
    result
}

async fn fetch_album(source: &dyn ManifestSource, id: &str) -> Result<AlbumPage, GalleryError> {
    let bytes = source.fetch().await.map_err(GalleryError::Fetch)?;
    let manifest = Manifest::from_slice(&bytes)?;
    let album = manifest
        .album(id)
        .ok_or_else(|| GalleryError::AlbumNotFound(id.to_string()))?;

    Ok(AlbumPage {
        id: id.to_string(),
        title: album.title.clone(),
        description: album.description.clone(),
        cover: album.cover.clone(),
        items: Arc::new(album.images.iter().map(ManifestImage::to_item).collect()),
    })
}
