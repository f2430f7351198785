use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::gallery::DEFAULT_PAGE_SIZE;
use crate::layout::resize::RESIZE_QUIET_PERIOD;
use crate::layout::LayoutConfig;

/// User configuration, read from `config.toml`.
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Grid used by the main gallery feed.
    pub layout: LayoutConfig,
    /// Grid used on single-album pages.
    pub album_layout: LayoutConfig,
    pub page_size: usize,
    pub resize_debounce_ms: u64,
    pub decode_workers: usize,
    /// Manifest used when none is given on the command line.
    pub manifest: Option<PathBuf>,
    /// Directory manifest asset URLs resolve under. Defaults to the
    /// manifest's parent directory.
    pub asset_root: Option<PathBuf>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            album_layout: LayoutConfig::album(),
            page_size: DEFAULT_PAGE_SIZE,
            resize_debounce_ms: RESIZE_QUIET_PERIOD.as_millis() as u64,
            decode_workers: 2,
            manifest: None,
            asset_root: None,
        }
    }
}

impl GalleryConfig {
    /// Loads `explicit`, or the default config file if it exists.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config file: {:?}", path))?;
        debug!(?path, "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse TOML")?;
        config.layout.validate().context("Invalid [layout]")?;
        config.album_layout.validate().context("Invalid [album_layout]")?;
        Ok(config)
    }

    /// `XDG_CONFIG_HOME/masonry-gallery/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "masonry-gallery").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn resize_quiet_period(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = GalleryConfig::from_toml("").unwrap();
        assert_eq!(config, GalleryConfig::default());
        assert_eq!(config.album_layout.column_width, 280.0);
        assert_eq!(config.resize_quiet_period(), Duration::from_millis(250));
    }

    #[test]
    fn test_partial_override() {
        let config = GalleryConfig::from_toml(
            r#"
            page_size = 12
            manifest = "/srv/site/data/albums.json"

            [layout]
            column_width = 240.0
            "#,
        )
        .unwrap();
        assert_eq!(config.page_size, 12);
        assert_eq!(config.layout.column_width, 240.0);
        assert_eq!(config.layout.gutter, 16.0);
        assert_eq!(
            config.manifest.as_deref(),
            Some(Path::new("/srv/site/data/albums.json"))
        );
    }

    #[test]
    fn test_rejects_invalid_layout() {
        let err = GalleryConfig::from_toml("[layout]\ncolumn_width = -5.0\n").unwrap_err();
        assert!(format!("{:#}", err).contains("column width"));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "decode_workers = 3").unwrap();
        let config = GalleryConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.decode_workers, 3);

        let dir = tempfile::tempdir().unwrap();
        assert!(GalleryConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
