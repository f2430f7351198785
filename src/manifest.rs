//! Album manifest written by the photo import job.
//!
//! The manifest is a JSON object keyed by album id; album order in the file is
//! the order albums appear in the flattened "all" view.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{GalleryFilter, GalleryItem};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    albums: IndexMap<String, Album>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub images: Vec<ManifestImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestImage {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub full: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub original_filename: String,
}

impl ManifestImage {
    pub fn to_item(&self) -> GalleryItem {
        GalleryItem::new(
            self.id.clone(),
            self.title.clone(),
            self.date.clone(),
            self.thumbnail.clone(),
            self.full.clone(),
        )
    }
}

impl Manifest {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn album(&self, id: &str) -> Option<&Album> {
        self.albums.get(id)
    }

    /// Albums in manifest order.
    pub fn albums(&self) -> impl Iterator<Item = (&str, &Album)> {
        self.albums.iter().map(|(id, album)| (id.as_str(), album))
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    /// Items matching `filter`, in manifest order.
    ///
    /// The "all" view labels each item with its album title. An unknown album
    /// yields nothing.
    pub fn select(&self, filter: &GalleryFilter) -> Vec<GalleryItem> {
        match filter {
            GalleryFilter::All => self
                .albums
                .values()
                .flat_map(|album| {
                    album
                        .images
                        .iter()
                        .map(|img| img.to_item().with_album_label(album.title.clone()))
                })
                .collect(),
            GalleryFilter::Album(id) => self
                .albums
                .get(id)
                .map(|album| album.images.iter().map(ManifestImage::to_item).collect())
                .unwrap_or_default(),
        }
    }
}

/// Newest first. Stable, so equal dates keep manifest order; undated items go last.
pub fn sort_newest_first(items: &mut [GalleryItem]) {
    items.sort_by_key(|item| std::cmp::Reverse(item.taken_at));
}

#[cfg(test)]
pub(crate) const SAMPLE_MANIFEST: &str = r#"{
    "nature": {
        "title": "Nature Photography",
        "description": "Capturing the beauty of landscapes and wildlife",
        "cover": "nature/cover.jpg",
        "images": [
            {
                "id": "nature-1",
                "title": "Fjord",
                "thumbnail": "/assets/images/thumbnails/nature/fjord.webp",
                "full": "/assets/images/full/nature/fjord.webp",
                "date": "2024-05-01",
                "metadata": { "width": 2000, "height": 1333, "originalFilename": "DSC_0001.jpg" }
            },
            {
                "id": "nature-2",
                "title": "Heron",
                "thumbnail": "/assets/images/thumbnails/nature/heron.webp",
                "full": "/assets/images/full/nature/heron.webp",
                "date": "2024-06-12"
            }
        ]
    },
    "street": {
        "title": "Street Photography",
        "description": "Urban life and street photography",
        "cover": "street/cover.jpg",
        "images": [
            {
                "id": "street-1",
                "title": "Crossing",
                "thumbnail": "/assets/images/thumbnails/street/crossing.webp",
                "full": "/assets/images/full/street/crossing.webp",
                "date": "2024-05-01"
            },
            {
                "id": "street-2",
                "title": "Neon",
                "thumbnail": "/assets/images/thumbnails/street/neon.webp",
                "full": "/assets/images/full/street/neon.webp",
                "date": "2023-11-30T21:15:00Z"
            }
        ]
    }
}"#;
