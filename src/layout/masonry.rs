//! Masonry layout engine.
//!
//! Items are placed one by one into the currently shortest column. Position is
//! assigned immediately; the column only grows once the item's height is known.
//! Images that are still decoding get a finalization task each, and every item
//! contributes to its column exactly once.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, error, trace, warn};

use super::columns::{ColumnMetrics, ColumnState};
use super::resolver::{HeightBounds, ImageHandle};
use super::LayoutConfig;
use crate::error::LayoutError;
use crate::models::ItemPlacement;

/// The element the grid is laid out in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    pub width: f32,
    /// Horizontal padding, applied on both sides.
    pub padding: f32,
}

impl Container {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            padding: 0.0,
        }
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Width and padding must be finite and non-negative.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.width.is_finite() && self.width >= 0.0) {
            return Err(LayoutError::Configuration(format!(
                "container width must be finite and non-negative, got {}",
                self.width
            )));
        }
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(LayoutError::Configuration(format!(
                "container padding must be finite and non-negative, got {}",
                self.padding
            )));
        }
        Ok(())
    }
}

/// What determines an item's height.
#[derive(Debug, Clone)]
pub enum ItemContent {
    /// An image; height follows its natural aspect ratio once decoded.
    Image(ImageHandle),
    /// Content without an image and with a known height.
    Block { height: f32 },
}

#[derive(Debug, Clone)]
pub struct LayoutItem {
    pub key: String,
    pub content: ItemContent,
}

impl LayoutItem {
    pub fn image(key: impl Into<String>, image: ImageHandle) -> Self {
        Self {
            key: key.into(),
            content: ItemContent::Image(image),
        }
    }

    pub fn block(key: impl Into<String>, height: f32) -> Self {
        Self {
            key: key.into(),
            content: ItemContent::Block { height },
        }
    }
}

/// An outstanding height for one placement of one pass.
struct Finalization {
    generation: u64,
    slot: usize,
    image: ImageHandle,
    width: f32,
}

enum Sizing {
    Known(f32),
    Deferred(ImageHandle),
}

struct LayoutState {
    container: Option<Container>,
    metrics: ColumnMetrics,
    columns: ColumnState,
    /// Items in insertion order.
    items: Vec<LayoutItem>,
    /// Parallel to `items` while a layout is live, empty otherwise.
    placements: Vec<ItemPlacement>,
    /// Bumped by every full pass and by destroy; older finalizations are stale.
    generation: u64,
    /// `None` means the container is back to natural flow.
    container_height: Option<f32>,
    pending: usize,
    passes: u64,
}

impl LayoutState {
    fn has_live_layout(&self) -> bool {
        self.container_height.is_some() && self.placements.len() == self.items.len()
    }

    /// Assigns column and position to `items[slot]`, finalizing it right away
    /// when its height is already known.
    fn place(&mut self, slot: usize, bounds: &HeightBounds) -> Option<Finalization> {
        let column = self.columns.shortest();
        let x = self.metrics.column_x(column);
        let y = self.columns.height(column);
        let width = self.metrics.column_width;

        let item = &self.items[slot];
        let key = item.key.clone();
        let sizing = match &item.content {
            ItemContent::Block { height } => Sizing::Known(*height),
            ItemContent::Image(image) => match bounds.height_for(width, image.state()) {
                Some(height) => Sizing::Known(height),
                None => Sizing::Deferred(image.clone()),
            },
        };

        self.placements
            .push(ItemPlacement::new(key, column, x, y, width));

        match sizing {
            Sizing::Known(height) => {
                self.finalize_slot(slot, height);
                None
            }
            Sizing::Deferred(image) => {
                self.pending += 1;
                Some(Finalization {
                    generation: self.generation,
                    slot,
                    image,
                    width,
                })
            }
        }
    }

    /// Applies a resolved height. Returns false if the slot was already final.
    fn finalize_slot(&mut self, slot: usize, height: f32) -> bool {
        let gutter = self.metrics.gutter;
        let Some(placement) = self.placements.get_mut(slot) else {
            return false;
        };
        if placement.height.is_some() {
            return false;
        }
        placement.height = Some(height);
        let column = placement.column;
        self.columns.advance(column, height, gutter);
        self.container_height = Some(self.columns.tallest());
        true
    }
}

struct Shared {
    config: LayoutConfig,
    state: Mutex<LayoutState>,
    pending_tx: watch::Sender<usize>,
}

impl Shared {
    fn finalize(&self, ticket: &Finalization, height: f32) {
        let mut state = self.state.lock();
        if ticket.generation != state.generation {
            trace!(
                slot = ticket.slot,
                generation = ticket.generation,
                "discarding stale finalization"
            );
            return;
        }
        if state.finalize_slot(ticket.slot, height) {
            state.pending = state.pending.saturating_sub(1);
            self.pending_tx.send_replace(state.pending);
            trace!(
                slot = ticket.slot,
                height,
                container_height = ?state.container_height,
                "finalized item"
            );
        }
    }
}

/// Masonry layout engine.
///
/// Cheap to clone; clones share the same grid. Decode notifications are
/// delivered on the Tokio runtime the engine was created in.
#[derive(Clone)]
pub struct MasonryLayout {
    shared: Arc<Shared>,
    runtime: Handle,
}

impl MasonryLayout {
    /// Creates an engine for `container`.
    ///
    /// Fails if the container is absent, the configuration is invalid, or no
    /// Tokio runtime is running.
    pub fn new(container: Option<Container>, config: LayoutConfig) -> Result<Self, LayoutError> {
        let result = Self::build(container, config);
        if let Err(e) = &result {
            error!(error = %e, "masonry layout not started");
        }
        result
    }

    fn build(container: Option<Container>, config: LayoutConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        let container =
            container.ok_or_else(|| LayoutError::Configuration("container not found".into()))?;
        container.validate()?;
        let runtime = Handle::try_current().map_err(|_| {
            LayoutError::Configuration("no Tokio runtime to deliver decode notifications".into())
        })?;

        let metrics = config.metrics_for(container);
        debug!(
            container_width = container.width,
            columns = metrics.count,
            column_width = metrics.column_width,
            "initialized masonry layout"
        );

        let state = LayoutState {
            container: Some(container),
            metrics,
            columns: ColumnState::new(metrics.count),
            items: Vec::new(),
            placements: Vec::new(),
            generation: 0,
            container_height: None,
            pending: 0,
            passes: 0,
        };
        let (pending_tx, _) = watch::channel(0);

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                state: Mutex::new(state),
                pending_tx,
            }),
            runtime,
        })
    }

    /// Replaces the item list and lays everything out from scratch.
    pub fn layout(&self, items: Vec<LayoutItem>) {
        let work = {
            let mut state = self.shared.state.lock();
            if state.container.is_none() {
                warn!(error = %LayoutError::ResourceMissing("container"), "skipping layout");
                return;
            }
            state.items = items;
            self.full_pass(&mut state)
        };
        self.spawn_finalizers(work);
    }

    /// Lays out the current items again, e.g. after the container resized.
    pub fn relayout(&self) {
        let work = {
            let mut state = self.shared.state.lock();
            self.full_pass(&mut state)
        };
        self.spawn_finalizers(work);
    }

    /// Appends items below the existing layout without moving placed items.
    ///
    /// Without a live layout (never laid out, or destroyed) this runs a full
    /// pass over all items instead.
    pub fn add_items(&self, items: Vec<LayoutItem>) {
        if items.is_empty() {
            return;
        }
        let work = {
            let mut state = self.shared.state.lock();
            if state.container.is_none() {
                warn!(error = %LayoutError::ResourceMissing("container"), "skipping add_items");
                return;
            }
            let live = state.has_live_layout();
            state.items.extend(items);
            if live {
                self.incremental_pass(&mut state)
            } else {
                self.full_pass(&mut state)
            }
        };
        self.spawn_finalizers(work);
    }

    /// Drops every placement and the container height override.
    ///
    /// Outstanding finalizations are discarded. Safe to call repeatedly.
    pub fn destroy(&self) {
        let mut state = self.shared.state.lock();
        let had_layout = state.container_height.is_some() || !state.placements.is_empty();
        state.generation += 1;
        state.placements.clear();
        state.container_height = None;
        state.pending = 0;
        let count = state.metrics.count;
        state.columns.reset(count);
        self.shared.pending_tx.send_replace(0);
        if had_layout {
            debug!("masonry layout destroyed");
        }
    }

    /// Replaces the container; `None` detaches the engine until one is set again.
    ///
    /// An invalid container is logged and ignored.
    pub fn set_container(&self, container: Option<Container>) {
        if let Some(Err(e)) = container.as_ref().map(Container::validate) {
            warn!(error = %e, "ignoring container");
            return;
        }
        self.shared.state.lock().container = container;
    }

    /// Updates the container width. An invalid width is logged and ignored.
    pub fn set_container_width(&self, width: f32) {
        let mut state = self.shared.state.lock();
        match state.container.as_mut() {
            Some(container) => {
                let resized = Container { width, ..*container };
                match resized.validate() {
                    Ok(()) => *container = resized,
                    Err(e) => warn!(error = %e, "ignoring container width"),
                }
            }
            None => warn!(
                error = %LayoutError::ResourceMissing("container"),
                width,
                "ignoring container width"
            ),
        }
    }

    fn full_pass(&self, state: &mut LayoutState) -> Vec<Finalization> {
        let Some(container) = state.container else {
            warn!(error = %LayoutError::ResourceMissing("container"), "skipping layout pass");
            return Vec::new();
        };

        state.generation += 1;
        state.passes += 1;
        state.metrics = self.shared.config.metrics_for(container);
        let count = state.metrics.count;
        state.columns.reset(count);
        state.placements.clear();
        state.pending = 0;
        state.container_height = Some(0.0);

        let bounds = self.shared.config.bounds();
        let mut work = Vec::new();
        for slot in 0..state.items.len() {
            if let Some(ticket) = state.place(slot, &bounds) {
                work.push(ticket);
            }
        }
        state.container_height = Some(state.columns.tallest());
        self.shared.pending_tx.send_replace(state.pending);

        debug!(
            items = state.items.len(),
            columns = count,
            column_width = state.metrics.column_width,
            pending = state.pending,
            "masonry layout pass"
        );
        work
    }

    fn incremental_pass(&self, state: &mut LayoutState) -> Vec<Finalization> {
        let bounds = self.shared.config.bounds();
        let start = state.placements.len();
        let mut work = Vec::new();
        for slot in start..state.items.len() {
            if let Some(ticket) = state.place(slot, &bounds) {
                work.push(ticket);
            }
        }
        self.shared.pending_tx.send_replace(state.pending);
        debug!(
            added = state.items.len() - start,
            pending = state.pending,
            "appended items to masonry layout"
        );
        work
    }

    fn spawn_finalizers(&self, work: Vec<Finalization>) {
        let bounds = self.shared.config.bounds();
        for ticket in work {
            let shared = Arc::downgrade(&self.shared);
            self.runtime.spawn(async move {
                let height = bounds.resolve(&ticket.image, ticket.width).await;
                if let Some(shared) = shared.upgrade() {
                    shared.finalize(&ticket, height);
                }
            });
        }
    }

    /// Resolves once no item of the current layout is waiting on its image.
    pub async fn settled(&self) {
        let mut rx = self.shared.pending_tx.subscribe();
        let _ = rx.wait_for(|pending| *pending == 0).await;
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.shared.config
    }

    pub(crate) fn runtime(&self) -> &Handle {
        &self.runtime
    }

    pub fn placements(&self) -> Vec<ItemPlacement> {
        self.shared.state.lock().placements.clone()
    }

    pub fn placement(&self, key: &str) -> Option<ItemPlacement> {
        self.shared
            .state
            .lock()
            .placements
            .iter()
            .find(|p| p.key == key)
            .cloned()
    }

    /// Height of the tallest column, or `None` when nothing is laid out.
    pub fn container_height(&self) -> Option<f32> {
        self.shared.state.lock().container_height
    }

    pub fn column_heights(&self) -> Vec<f32> {
        self.shared.state.lock().columns.heights().to_vec()
    }

    pub fn column_count(&self) -> usize {
        self.shared.state.lock().metrics.count
    }

    pub fn column_width(&self) -> f32 {
        self.shared.state.lock().metrics.column_width
    }

    pub fn item_count(&self) -> usize {
        self.shared.state.lock().items.len()
    }

    pub fn pending_count(&self) -> usize {
        self.shared.state.lock().pending
    }

    /// Number of full layout passes run so far.
    pub fn passes(&self) -> u64 {
        self.shared.state.lock().passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::resolver::FALLBACK_IMAGE_HEIGHT;
    use proptest::prelude::*;

    fn engine(width: f32) -> MasonryLayout {
        MasonryLayout::new(Some(Container::new(width)), LayoutConfig::default()).unwrap()
    }

    fn blocks(prefix: &str, n: usize, height: f32) -> Vec<LayoutItem> {
        (0..n)
            .map(|i| LayoutItem::block(format!("{}{}", prefix, i), height))
            .collect()
    }

    async fn wait_for_pending(layout: &MasonryLayout, pending: usize) {
        for _ in 0..100 {
            if layout.pending_count() == pending {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("pending count stuck at {}", layout.pending_count());
    }

    fn assert_container_is_tallest(layout: &MasonryLayout) {
        let tallest = layout
            .column_heights()
            .into_iter()
            .fold(0.0f32, f32::max);
        assert_eq!(layout.container_height(), Some(tallest));
    }

    #[tokio::test]
    async fn test_five_blocks_two_columns() {
        // 700 / 316 -> 2 columns
        let layout = engine(700.0);
        layout.layout(blocks("item", 5, 200.0));

        assert_eq!(layout.column_count(), 2);
        let columns: Vec<usize> = layout.placements().iter().map(|p| p.column).collect();
        assert_eq!(columns, vec![0, 1, 0, 1, 0]);
        assert_eq!(layout.column_heights(), vec![648.0, 432.0]);
        assert_eq!(layout.container_height(), Some(648.0));

        let ys: Vec<f32> = layout.placements().iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![0.0, 0.0, 216.0, 216.0, 432.0]);
    }

    #[tokio::test]
    async fn test_x_follows_column() {
        let layout = engine(964.0);
        layout.layout(blocks("item", 7, 180.0));
        let width = layout.column_width();
        for p in layout.placements() {
            assert!((p.x - p.column as f32 * (width + 16.0)).abs() < 0.001);
            assert!((p.width - width).abs() < 0.001);
            assert!(p.is_loaded());
        }
    }

    #[tokio::test]
    async fn test_zero_items() {
        let layout = engine(964.0);
        layout.layout(Vec::new());
        assert_eq!(layout.container_height(), Some(0.0));
        assert!(layout.placements().is_empty());
    }

    #[tokio::test]
    async fn test_decoded_images_resolve_synchronously() {
        let layout = engine(964.0);
        let width = layout.column_width();
        layout.layout(vec![
            LayoutItem::image("a", ImageHandle::decoded(1000, 1000)),
            LayoutItem::image("b", ImageHandle::decoded(2000, 1000)),
        ]);

        assert_eq!(layout.pending_count(), 0);
        let a = layout.placement("a").unwrap();
        assert!((a.height.unwrap() - width).abs() < 0.01);
        let b = layout.placement("b").unwrap();
        assert!((b.height.unwrap() - width / 2.0).abs() < 0.01);
        assert_eq!(b.column, 1);
    }

    #[tokio::test]
    async fn test_layout_is_idempotent() {
        let layout = engine(1280.0);
        let items = vec![
            LayoutItem::image("a", ImageHandle::decoded(1200, 800)),
            LayoutItem::image("b", ImageHandle::decoded(800, 1200)),
            LayoutItem::block("c", 210.0),
            LayoutItem::image("d", ImageHandle::decoded(1000, 1000)),
            LayoutItem::image("e", ImageHandle::decoded(1600, 900)),
        ];
        layout.layout(items);
        let first = layout.placements();
        let first_height = layout.container_height();

        layout.relayout();
        assert_eq!(layout.placements(), first);
        assert_eq!(layout.container_height(), first_height);
        assert_eq!(layout.passes(), 2);
    }

    #[tokio::test]
    async fn test_deferred_heights_finalize_out_of_order() {
        let layout = engine(700.0);
        let mut signals = Vec::new();
        let mut items = Vec::new();
        for i in 0..4 {
            let (signal, handle) = ImageHandle::pending();
            signals.push(Some(signal));
            items.push(LayoutItem::image(format!("img{}", i), handle));
        }
        layout.layout(items);

        // Nothing is final yet, so every item sees column 0 as shortest.
        assert_eq!(layout.pending_count(), 4);
        assert_eq!(layout.container_height(), Some(0.0));
        assert!(layout.placements().iter().all(|p| p.column == 0 && p.y == 0.0));

        let width = layout.column_width();
        let order = [2usize, 0, 3, 1];
        for (done, &i) in order.iter().enumerate() {
            // Natural 1:1 gives a clamped square.
            signals[i].take().unwrap().decoded(500, 500);
            wait_for_pending(&layout, 3 - done).await;
            assert_container_is_tallest(&layout);
        }

        layout.settled().await;
        let expected = 4.0 * (width.clamp(150.0, 600.0) + 16.0);
        assert!((layout.column_heights()[0] - expected).abs() < 0.01);
        assert!(layout.placements().iter().all(|p| p.is_loaded()));
    }

    #[tokio::test]
    async fn test_decode_failure_uses_fallback() {
        let layout = engine(964.0);
        let (signal, pending) = ImageHandle::pending();
        layout.layout(vec![
            LayoutItem::image("broken", ImageHandle::failed()),
            LayoutItem::image("lost", pending),
            LayoutItem::block("text", 100.0),
        ]);
        assert_eq!(
            layout.placement("broken").unwrap().height,
            Some(FALLBACK_IMAGE_HEIGHT)
        );

        drop(signal);
        layout.settled().await;
        let lost = layout.placement("lost").unwrap();
        assert_eq!(lost.height, Some(FALLBACK_IMAGE_HEIGHT));

        // "lost" and "text" share column 1; "text" was final first.
        assert_eq!(lost.column, 1);
        assert_eq!(layout.placement("text").unwrap().column, 1);
        assert_eq!(
            layout.container_height(),
            Some(100.0 + 16.0 + FALLBACK_IMAGE_HEIGHT + 16.0)
        );
        assert_container_is_tallest(&layout);
    }

    #[tokio::test]
    async fn test_stale_finalization_is_ignored_after_relayout() {
        let layout = engine(700.0);
        let (signal, handle) = ImageHandle::pending();
        layout.layout(vec![LayoutItem::image("slow", handle)]);
        // Second pass while the first pass's finalizer is still waiting.
        layout.relayout();
        assert_eq!(layout.pending_count(), 1);

        signal.decoded(100, 100);
        layout.settled().await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        let height = layout.placement("slow").unwrap().height.unwrap();
        // Counted once, not once per pass.
        assert_eq!(layout.column_heights()[0], height + 16.0);
        assert_eq!(layout.container_height(), Some(height + 16.0));
    }

    #[tokio::test]
    async fn test_add_items_appends_from_current_heights() {
        let layout = engine(700.0);
        layout.layout(blocks("first", 3, 200.0));
        let before = layout.placements();
        let heights = layout.column_heights();
        assert_eq!(heights, vec![432.0, 216.0]);

        layout.add_items(blocks("second", 2, 100.0));
        let after = layout.placements();
        assert_eq!(&after[..3], &before[..]);

        // Column 1 was shortest at 216, then column 1 again at 332.
        assert_eq!(after[3].column, 1);
        assert_eq!(after[3].y, 216.0);
        assert_eq!(after[4].column, 1);
        assert_eq!(after[4].y, 332.0);
        assert_eq!(layout.column_heights(), vec![432.0, 448.0]);
        assert_eq!(layout.container_height(), Some(448.0));
        assert_eq!(layout.passes(), 1);
    }

    #[tokio::test]
    async fn test_add_items_without_layout_runs_full_pass() {
        let layout = engine(700.0);
        layout.add_items(blocks("item", 2, 200.0));
        assert_eq!(layout.passes(), 1);
        assert_eq!(layout.placements().len(), 2);
    }

    #[tokio::test]
    async fn test_destroy_returns_to_natural_flow() {
        let layout = engine(700.0);
        let (signal, handle) = ImageHandle::pending();
        let mut items = blocks("item", 2, 200.0);
        items.push(LayoutItem::image("late", handle));
        layout.layout(items);

        layout.destroy();
        assert_eq!(layout.container_height(), None);
        assert!(layout.placements().is_empty());
        layout.destroy();
        assert_eq!(layout.container_height(), None);

        // The old pass's finalizer must not resurrect anything.
        signal.decoded(10, 10);
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(layout.placements().is_empty());
        assert_eq!(layout.column_heights(), vec![0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_missing_container() {
        let err = MasonryLayout::new(None, LayoutConfig::default()).err();
        assert!(matches!(err, Some(LayoutError::Configuration(_))));

        let layout = engine(700.0);
        layout.set_container(None);
        layout.layout(blocks("item", 2, 200.0));
        layout.relayout();
        layout.add_items(blocks("more", 1, 200.0));
        assert_eq!(layout.passes(), 0);
        assert_eq!(layout.container_height(), None);
    }

    #[tokio::test]
    async fn test_invalid_config() {
        let err = MasonryLayout::new(Some(Container::new(700.0)), LayoutConfig::new(0.0, 16.0));
        assert!(matches!(err, Err(LayoutError::Configuration(_))));
    }

    #[test]
    fn test_requires_runtime() {
        let err = MasonryLayout::new(Some(Container::new(700.0)), LayoutConfig::default());
        assert!(matches!(err, Err(LayoutError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_resize_changes_column_count() {
        let layout = engine(964.0);
        layout.layout(blocks("item", 6, 200.0));
        assert_eq!(layout.column_count(), 3);

        layout.set_container_width(400.0);
        layout.relayout();
        assert_eq!(layout.column_count(), 1);
        assert_eq!(layout.container_height(), Some(6.0 * 216.0));
    }

    #[tokio::test]
    async fn test_unusable_container_width_is_ignored() {
        let layout = engine(964.0);
        layout.layout(blocks("item", 3, 100.0));

        for width in [f32::INFINITY, f32::NAN, -10.0] {
            layout.set_container_width(width);
            layout.layout(vec![LayoutItem::block("a", 100.0)]);
            assert_eq!(layout.column_count(), 3);
            assert_eq!(layout.container_height(), Some(116.0));
        }

        layout.set_container(Some(Container::new(700.0).with_padding(f32::NAN)));
        layout.relayout();
        assert_eq!(layout.column_count(), 3);

        let err = MasonryLayout::new(Some(Container::new(f32::INFINITY)), LayoutConfig::default());
        assert!(matches!(err, Err(LayoutError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_huge_container_is_capped() {
        let layout = engine(1.0e9);
        layout.layout(blocks("item", 2, 100.0));
        assert_eq!(layout.column_count(), crate::layout::columns::MAX_COLUMNS);
        assert_container_is_tallest(&layout);
    }

    #[tokio::test]
    async fn test_padding_narrows_columns() {
        let layout = MasonryLayout::new(
            Some(Container::new(964.0).with_padding(20.0)),
            LayoutConfig::default(),
        )
        .unwrap();
        layout.layout(blocks("item", 3, 100.0));
        assert_eq!(layout.column_count(), 2);
        assert!((layout.column_width() - 454.0).abs() < 0.01);
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    fn shuffled_images() -> impl Strategy<Value = (Vec<(u32, u32)>, Vec<usize>)> {
        (1usize..12).prop_flat_map(|n| {
            (
                prop::collection::vec((1u32..4000, 1u32..4000), n),
                Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
            )
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Whatever order images decode in, the container tracks the tallest column.
        #[test]
        fn prop_container_is_tallest_in_any_order(
            width in 200.0f32..2000.0,
            (sizes, order) in shuffled_images(),
        ) {
            let rt = runtime();
            rt.block_on(async {
                let layout = engine(width);
                let mut signals = Vec::new();
                let mut items = Vec::new();
                for (i, _) in sizes.iter().enumerate() {
                    let (signal, handle) = ImageHandle::pending();
                    signals.push(Some(signal));
                    items.push(LayoutItem::image(format!("img{}", i), handle));
                }
                layout.layout(items);

                for (done, &i) in order.iter().enumerate() {
                    let (w, h) = sizes[i];
                    if let Some(signal) = signals[i].take() {
                        signal.decoded(w, h);
                    }
                    wait_for_pending(&layout, sizes.len() - done - 1).await;
                    assert_container_is_tallest(&layout);
                }
                assert!(layout.placements().iter().all(|p| p.is_loaded()));
            });
        }

        /// Every placement sits at its column's x offset with the column width.
        #[test]
        fn prop_x_follows_column(
            width in 0.0f32..4000.0,
            column_width in 50.0f32..600.0,
            gutter in 0.0f32..48.0,
            heights in prop::collection::vec(1.0f32..800.0, 0..40),
        ) {
            let rt = runtime();
            let _guard = rt.enter();
            let layout = MasonryLayout::new(
                Some(Container::new(width)),
                LayoutConfig::new(column_width, gutter),
            )
            .unwrap();
            layout.layout(
                heights
                    .iter()
                    .enumerate()
                    .map(|(i, h)| LayoutItem::block(format!("b{}", i), *h))
                    .collect(),
            );

            let w = layout.column_width();
            for p in layout.placements() {
                prop_assert!((p.x - p.column as f32 * (w + gutter)).abs() < 0.01);
                prop_assert_eq!(p.width, w);
            }
            assert_container_is_tallest(&layout);
        }
    }
}
