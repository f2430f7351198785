use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use xxhash_rust::xxh3::xxh3_64;

use crate::models::{GalleryFilter, GalleryItem};

/// Maximum number of cached views to keep in memory.
const MAX_CACHE_ENTRIES: usize = 8;

/// Key combining the manifest content hash and the filter it was viewed through.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct ViewKey {
    manifest_hash: u64,
    filter: GalleryFilter,
}

/// Cache of filtered and sorted gallery views.
///
/// The manifest is refetched for every page, but it rarely changes between
/// pages. Keying on the hash of the raw bytes lets an unchanged manifest skip
/// parsing, flattening and sorting; any edit to the file yields a new key.
pub struct ViewCache {
    entries: Mutex<LruCache<ViewKey, Arc<Vec<GalleryItem>>>>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHE_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Fast content hash of a manifest body.
    pub fn manifest_hash(bytes: &[u8]) -> u64 {
        xxh3_64(bytes)
    }

    pub fn get(&self, manifest_hash: u64, filter: &GalleryFilter) -> Option<Arc<Vec<GalleryItem>>> {
        let key = ViewKey {
            manifest_hash,
            filter: filter.clone(),
        };
        self.entries.lock().get(&key).cloned()
    }

    pub fn insert(
        &self,
        manifest_hash: u64,
        filter: &GalleryFilter,
        items: Vec<GalleryItem>,
    ) -> Arc<Vec<GalleryItem>> {
        let items = Arc::new(items);
        let key = ViewKey {
            manifest_hash,
            filter: filter.clone(),
        };
        self.entries.lock().put(key, Arc::clone(&items));
        items
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::new()
    }
}
