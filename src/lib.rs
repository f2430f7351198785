//! Masonry gallery core: manifest selection and paging, greedy
//! shortest-column layout with asynchronous image heights, and debounced
//! re-layout on resize.

pub mod config;
pub mod decode;
pub mod error;
pub mod gallery;
pub mod image_loader;
pub mod layout;
pub mod manifest;
pub mod models;

pub use config::GalleryConfig;
pub use error::{GalleryError, LayoutError};
pub use gallery::{GalleryController, Lightbox, PageOutcome};
pub use layout::{Container, LayoutConfig, LayoutItem, MasonryLayout, ResizeController};
pub use manifest::Manifest;
pub use models::{GalleryFilter, GalleryItem, ItemPlacement};
