use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tokio::runtime::Builder as TokioRuntimeBuilder;
use tracing::{debug, info};

use masonry_gallery::decode::{DecodeQueueBuilder, ImageSource};
use masonry_gallery::gallery::{load_album, FileManifestSource, ManifestSource, PageOutcome};
use masonry_gallery::{
    Container, GalleryConfig, GalleryController, GalleryFilter, ItemPlacement, LayoutConfig,
    Manifest, MasonryLayout, ResizeController,
};

use crate::cli::{Cli, Command, GridArgs, SiteArgs};

#[derive(Serialize)]
struct GridReport {
    container_height: Option<f32>,
    columns: usize,
    column_width: f32,
    placements: Vec<ItemPlacement>,
}

#[derive(Serialize)]
struct FeedReport {
    filter: String,
    pages_loaded: u64,
    items: usize,
    has_more: bool,
    #[serde(flatten)]
    grid: GridReport,
}

#[derive(Serialize)]
struct AlbumReport {
    id: String,
    title: String,
    description: String,
    #[serde(flatten)]
    grid: GridReport,
}

#[derive(Serialize)]
struct AlbumSummary<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    cover: &'a str,
    images: usize,
}

/// Manifest and asset locations after merging CLI flags with the config file.
struct Site {
    manifest: PathBuf,
    assets: PathBuf,
}

impl Site {
    fn resolve(args: &SiteArgs, config: &GalleryConfig) -> Result<Self> {
        let manifest = args
            .manifest
            .clone()
            .or_else(|| config.manifest.clone())
            .ok_or_else(|| anyhow!("No manifest given (use --manifest or set `manifest` in the config)"))?;
        let assets = args
            .assets
            .clone()
            .or_else(|| config.asset_root.clone())
            .or_else(|| manifest.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self { manifest, assets })
    }

    fn source(&self) -> FileManifestSource {
        FileManifestSource::new(&self.manifest)
    }

    fn images(&self, config: &GalleryConfig) -> Result<Arc<dyn ImageSource>> {
        let queue = DecodeQueueBuilder::new(&self.assets)
            .workers(config.decode_workers)
            .build()?;
        Ok(Arc::new(queue))
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = GalleryConfig::load(cli.config.as_deref())?;
    let runtime = TokioRuntimeBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let output = runtime.block_on(dispatch(cli.command, &config))?;

    println!("{}", output);
    Ok(())
}

async fn dispatch(command: Command, config: &GalleryConfig) -> Result<String> {
    match command {
        Command::Layout {
            site,
            filter,
            pages,
            grid,
            widths,
        } => {
            let filter: GalleryFilter = filter.parse().unwrap_or_default();
            let site = Site::resolve(&site, config)?;
            feed(&site, config, filter, pages, &grid, &widths).await
        }
        Command::Album { site, id, grid } => {
            album(&Site::resolve(&site, config)?, config, &id, &grid).await
        }
        Command::Albums { site } => albums(&Site::resolve(&site, config)?).await,
    }
}

fn grid_report(layout: &MasonryLayout) -> GridReport {
    GridReport {
        container_height: layout.container_height(),
        columns: layout.column_count(),
        column_width: layout.column_width(),
        placements: layout.placements(),
    }
}

fn engine(grid: &GridArgs, config: LayoutConfig) -> Result<MasonryLayout> {
    let container = Container::new(grid.width).with_padding(grid.padding);
    MasonryLayout::new(Some(container), config).context("Failed to create layout")
}

/// Feeds `widths` through a debounced resize controller and waits for the
/// resulting relayout.
async fn replay_resizes(layout: &MasonryLayout, config: &GalleryConfig, widths: &[f32]) {
    if widths.is_empty() {
        return;
    }
    let quiet = config.resize_quiet_period();
    let resize = ResizeController::new(layout.clone(), quiet);
    let before = layout.passes();
    for width in widths {
        resize.notify(*width);
    }
    while layout.passes() == before {
        tokio::time::sleep(quiet).await;
    }
    resize.shutdown();
    debug!(passes = layout.passes() - before, "resizes replayed");
}

async fn feed(
    site: &Site,
    config: &GalleryConfig,
    filter: GalleryFilter,
    pages: u64,
    grid: &GridArgs,
    widths: &[f32],
) -> Result<String> {
    let layout = engine(grid, config.layout)?;
    let source: Arc<dyn ManifestSource> = Arc::new(site.source());
    let controller = GalleryController::new(source, site.images(config)?, layout.clone())
        .with_page_size(config.page_size);

    let mut pages_loaded = 0u64;
    let mut outcome = controller.apply_filter(filter).await;
    loop {
        match outcome {
            PageOutcome::Loaded { .. } => pages_loaded += 1,
            PageOutcome::Failed(err) => return Err(err).context("Failed to load gallery page"),
            PageOutcome::Skipped(reason) => {
                debug!(?reason, "no more pages");
                break;
            }
        }
        if pages_loaded >= pages {
            break;
        }
        outcome = controller.load_next_page().await;
    }

    layout.settled().await;
    replay_resizes(&layout, config, widths).await;
    layout.settled().await;
    info!(pages_loaded, items = controller.item_count(), "gallery laid out");

    let report = FeedReport {
        filter: controller.filter().to_string(),
        pages_loaded,
        items: controller.item_count(),
        has_more: controller.has_more(),
        grid: grid_report(&layout),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

async fn album(site: &Site, config: &GalleryConfig, id: &str, grid: &GridArgs) -> Result<String> {
    let page = load_album(&site.source(), id).await?;
    let images = site.images(config)?;
    let layout = engine(grid, config.album_layout)?;
    layout.layout(page.layout_items(images.as_ref()));
    layout.settled().await;

    let report = AlbumReport {
        id: page.id.clone(),
        title: page.title.clone(),
        description: page.description.clone(),
        grid: grid_report(&layout),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

async fn albums(site: &Site) -> Result<String> {
    let bytes = tokio::fs::read(&site.manifest)
        .await
        .with_context(|| format!("Failed to read manifest: {:?}", site.manifest))?;
    let manifest = Manifest::from_slice(&bytes).context("Malformed manifest")?;
    let summaries: Vec<AlbumSummary<'_>> = manifest
        .albums()
        .map(|(id, album)| AlbumSummary {
            id,
            title: &album.title,
            description: &album.description,
            cover: &album.cover,
            images: album.images.len(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&summaries)?)
}
