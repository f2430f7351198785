use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mgallery")]
#[command(about = "Masonry layout for photo album manifests")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lay out the paged gallery feed and print placements as JSON
    Layout {
        #[command(flatten)]
        site: SiteArgs,
        /// "all" or an album id
        #[arg(long, default_value = "all")]
        filter: String,
        /// Number of pages to load
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        pages: u64,
        #[command(flatten)]
        grid: GridArgs,
        /// Container widths to resize through after loading, e.g. 1024,800
        #[arg(long, value_delimiter = ',')]
        widths: Vec<f32>,
    },
    /// Lay out a single album page and print placements as JSON
    Album {
        #[command(flatten)]
        site: SiteArgs,
        /// Album id
        id: String,
        #[command(flatten)]
        grid: GridArgs,
    },
    /// List the albums in a manifest
    Albums {
        #[command(flatten)]
        site: SiteArgs,
    },
}

#[derive(Args, Debug)]
pub struct SiteArgs {
    /// Album manifest (JSON)
    #[arg(long)]
    pub manifest: Option<PathBuf>,
    /// Directory asset URLs resolve under
    #[arg(long)]
    pub assets: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GridArgs {
    /// Container width in pixels
    #[arg(long, default_value_t = 1280.0)]
    pub width: f32,
    /// Horizontal container padding in pixels, applied on both sides
    #[arg(long, default_value_t = 0.0)]
    pub padding: f32,
}
