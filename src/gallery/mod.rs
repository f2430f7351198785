pub mod album;
pub mod controller;
pub mod lightbox;
pub mod source;
pub mod view_cache;

pub use album::{load_album, AlbumPage};
pub use controller::{GalleryContext, GalleryController, PageOutcome, SkipReason, DEFAULT_PAGE_SIZE};
pub use lightbox::{Lightbox, LightboxKey};
pub use source::{FileManifestSource, ManifestSource, StaticManifestSource};
pub use view_cache::ViewCache;
