use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Which part of the manifest a gallery view is drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GalleryFilter {
    /// Every album, flattened in manifest order.
    #[default]
    All,
    /// A single album by its manifest key.
    Album(String),
}

impl GalleryFilter {
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Album(id) => id,
        }
    }
}

impl std::str::FromStr for GalleryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" | "all" => Self::All,
            other => Self::Album(other.to_string()),
        })
    }
}

impl std::fmt::Display for GalleryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One image as the gallery shows it. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryItem {
    pub id: String,
    pub title: String,
    /// Date string exactly as it appears in the manifest.
    pub date: String,
    pub thumbnail_url: String,
    pub full_url: String,
    /// Title of the owning album, set only for the flattened "all" view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_label: Option<String>,
    #[serde(skip)]
    pub taken_at: Option<NaiveDateTime>,
}

impl GalleryItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        date: impl Into<String>,
        thumbnail_url: impl Into<String>,
        full_url: impl Into<String>,
    ) -> Self {
        let date = date.into();
        let taken_at = parse_manifest_date(&date);
        Self {
            id: id.into(),
            title: title.into(),
            date,
            thumbnail_url: thumbnail_url.into(),
            full_url: full_url.into(),
            album_label: None,
            taken_at,
        }
    }

    pub fn with_album_label(mut self, label: impl Into<String>) -> Self {
        self.album_label = Some(label.into());
        self
    }
}

/// Parses the ISO-8601 flavours the import job writes.
///
/// Accepts RFC 3339 timestamps (normalized to UTC), naive timestamps and
/// plain dates (midnight). Returns `None` for anything else.
pub fn parse_manifest_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
