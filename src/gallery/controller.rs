//! Paged, filterable gallery feed.
//!
//! The controller fetches the manifest for every page, selects and sorts the
//! filtered view, slices out the next page and hands it to the layout engine:
//! page 1 through a full `layout`, later pages through `add_items`.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use super::lightbox::Lightbox;
use super::source::ManifestSource;
use super::view_cache::ViewCache;
use crate::decode::ImageSource;
use crate::error::GalleryError;
use crate::layout::{LayoutItem, MasonryLayout};
use crate::manifest::{sort_newest_first, Manifest};
use crate::models::{GalleryFilter, GalleryItem};

/// Images per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Pagination state of one gallery view.
#[derive(Debug, Clone)]
pub struct GalleryContext {
    pub filter: GalleryFilter,
    /// 1-based page the next load will fetch.
    pub next_page: usize,
    pub has_more: bool,
    pub loading: bool,
    /// Items loaded so far, in display order.
    pub items: Vec<GalleryItem>,
}

impl Default for GalleryContext {
    fn default() -> Self {
        Self {
            filter: GalleryFilter::All,
            next_page: 1,
            has_more: true,
            loading: false,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another load is in flight. The request is dropped, not queued.
    InFlight,
    /// Every page of the current filter has been loaded.
    Exhausted,
}

#[derive(Debug)]
pub enum PageOutcome {
    Loaded { page: usize, added: usize },
    Skipped(SkipReason),
    Failed(GalleryError),
}

impl PageOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Clears `loading` when a load finishes, fails or is dropped mid-fetch.
struct LoadingGuard<'a> {
    ctx: &'a Mutex<GalleryContext>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.ctx.lock().loading = false;
    }
}

pub struct GalleryController {
    source: Arc<dyn ManifestSource>,
    images: Arc<dyn ImageSource>,
    layout: MasonryLayout,
    views: ViewCache,
    page_size: usize,
    ctx: Mutex<GalleryContext>,
}

impl GalleryController {
    pub fn new(
        source: Arc<dyn ManifestSource>,
        images: Arc<dyn ImageSource>,
        layout: MasonryLayout,
    ) -> Self {
        Self {
            source,
            images,
            layout,
            views: ViewCache::new(),
            page_size: DEFAULT_PAGE_SIZE,
            ctx: Mutex::new(GalleryContext::default()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fetches and lays out the next page.
    pub async fn load_next_page(&self) -> PageOutcome {
        let (guard, page, filter) = match self.begin_load() {
            Ok(started) => started,
            Err(reason) => {
                debug!(?reason, "dropping page request");
                return PageOutcome::Skipped(reason);
            }
        };

        let view = match self.fetch_view(&filter).await {
            Ok(view) => view,
            Err(err) => {
                warn!(page, %filter, error = %err, "failed to load gallery page");
                return PageOutcome::Failed(err);
            }
        };

        let total = view.len();
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(total);
        let page_items = view.get(start..end).map(<[_]>::to_vec).unwrap_or_default();
        let has_more = start + self.page_size < total;
        let added = page_items.len();

        {
            let mut ctx = self.ctx.lock();
            ctx.next_page = page + 1;
            ctx.has_more = has_more;
            ctx.items.extend(page_items.iter().cloned());
        }

        let layout_items = page_items
            .iter()
            .map(|item| LayoutItem::image(item.id.clone(), self.images.request(&item.thumbnail_url)))
            .collect();
        if page == 1 {
            self.layout.layout(layout_items);
        } else {
            self.layout.add_items(layout_items);
        }
        drop(guard);

        info!(page, added, total, has_more, %filter, "loaded gallery page");
        PageOutcome::Loaded { page, added }
    }

    /// Switches to `filter` and loads its first page.
    ///
    /// Dropped while a load is in flight.
    pub async fn apply_filter(&self, filter: GalleryFilter) -> PageOutcome {
        {
            let mut ctx = self.ctx.lock();
            if ctx.loading {
                debug!(%filter, "dropping filter change during load");
                return PageOutcome::Skipped(SkipReason::InFlight);
            }
            debug!(from = %ctx.filter, to = %filter, "applying gallery filter");
            ctx.filter = filter;
            ctx.next_page = 1;
            ctx.has_more = true;
            ctx.items.clear();
        }
        self.layout.destroy();
        self.load_next_page().await
    }

    fn begin_load(&self) -> Result<(LoadingGuard<'_>, usize, GalleryFilter), SkipReason> {
        let mut ctx = self.ctx.lock();
        if ctx.loading {
            return Err(SkipReason::InFlight);
        }
        if !ctx.has_more {
            return Err(SkipReason::Exhausted);
        }
        ctx.loading = true;
        let started = (ctx.next_page, ctx.filter.clone());
        drop(ctx);
        Ok((LoadingGuard { ctx: &self.ctx }, started.0, started.1))
    }

    async fn fetch_view(&self, filter: &GalleryFilter) -> Result<Arc<Vec<GalleryItem>>, GalleryError> {
        let bytes = self.source.fetch().await.map_err(GalleryError::Fetch)?;
        let hash = ViewCache::manifest_hash(&bytes);
        if let Some(view) = self.views.get(hash, filter) {
            trace!(hash, "gallery view cache hit");
            return Ok(view);
        }

        let manifest = Manifest::from_slice(&bytes)?;
        let mut items = manifest.select(filter);
        sort_newest_first(&mut items);
        debug!(hash, albums = manifest.len(), items = items.len(), "built gallery view");
        Ok(self.views.insert(hash, filter, items))
    }

    /// Lightbox over the items loaded so far, opened on `id`.
    pub fn open_lightbox(&self, id: &str) -> Option<Lightbox> {
        let mut lightbox = Lightbox::new(Arc::new(self.ctx.lock().items.clone()));
        lightbox.open(id).then_some(lightbox)
    }

    pub fn context(&self) -> GalleryContext {
        self.ctx.lock().clone()
    }

    pub fn filter(&self) -> GalleryFilter {
        self.ctx.lock().filter.clone()
    }

    pub fn next_page(&self) -> usize {
        self.ctx.lock().next_page
    }

    pub fn has_more(&self) -> bool {
        self.ctx.lock().has_more
    }

    pub fn is_loading(&self) -> bool {
        self.ctx.lock().loading
    }

    pub fn items(&self) -> Vec<GalleryItem> {
        self.ctx.lock().items.clone()
    }

    pub fn item_count(&self) -> usize {
        self.ctx.lock().items.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn layout(&self) -> &MasonryLayout {
        &self.layout
    }
}
