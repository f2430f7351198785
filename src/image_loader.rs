use std::io::Cursor;
use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use image::ImageReader;

/// Reads an image's natural dimensions without decoding its pixels.
pub fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read image: {:?}", path))?;
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("Failed to guess image format")?;
    if reader.format().is_none() {
        return Err(anyhow!("Unrecognized image format: {:?}", path));
    }
    reader
        .into_dimensions()
        .with_context(|| format!("Failed to read dimensions: {:?}", path))
}

/// Maps a manifest asset URL such as `/assets/images/thumbnails/a.webp` to a
/// file under `root`.
///
/// Returns `None` for remote URLs and for paths that would leave `root`.
pub fn resolve_asset_path(root: &Path, url: &str) -> Option<PathBuf> {
    if url.contains("://") {
        return None;
    }
    let url = url.split(['?', '#']).next().unwrap_or_default();
    let relative = url.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    let mut resolved = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_dimensions_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::new(40, 30).save(&path).unwrap();
        assert_eq!(read_dimensions(&path).unwrap(), (40, 30));
    }

    #[test]
    fn test_read_dimensions_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not an image").unwrap();
        assert!(read_dimensions(&path).is_err());
        assert!(read_dimensions(&dir.path().join("missing.png")).is_err());
    }

    #[test]
    fn test_resolve_asset_path() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_asset_path(root, "/assets/images/thumbnails/a.webp"),
            Some(PathBuf::from("/srv/site/assets/images/thumbnails/a.webp"))
        );
        assert_eq!(
            resolve_asset_path(root, "./b.png?v=2"),
            Some(PathBuf::from("/srv/site/b.png"))
        );
    }

    #[test]
    fn test_resolve_asset_path_rejects_escapes() {
        let root = Path::new("/srv/site");
        assert_eq!(resolve_asset_path(root, "/assets/../../etc/passwd"), None);
        assert_eq!(resolve_asset_path(root, "https://cdn.example.com/a.jpg"), None);
        assert_eq!(resolve_asset_path(root, "/"), None);
    }
}
