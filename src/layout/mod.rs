pub mod columns;
pub mod masonry;
pub mod resize;
pub mod resolver;

pub use columns::{ColumnMetrics, ColumnState};
pub use masonry::{Container, ItemContent, LayoutItem, MasonryLayout};
pub use resize::ResizeController;
pub use resolver::{DecodeSignal, DecodeState, HeightBounds, ImageHandle};

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Configuration for the masonry layout.
///
/// Columns aim for `column_width` and are then stretched to fill the container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Target column width in pixels (default: 300)
    pub column_width: f32,
    /// Gap between columns and between stacked items in pixels (default: 16)
    pub gutter: f32,
    /// Minimum rendered image height (default: 150)
    pub min_image_height: f32,
    /// Maximum rendered image height (default: 600)
    pub max_image_height: f32,
    /// Height used for images that fail to decode (default: 250)
    pub fallback_image_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_width: 300.0,
            gutter: 16.0,
            min_image_height: resolver::MIN_IMAGE_HEIGHT,
            max_image_height: resolver::MAX_IMAGE_HEIGHT,
            fallback_image_height: resolver::FALLBACK_IMAGE_HEIGHT,
        }
    }
}

impl LayoutConfig {
    pub fn new(column_width: f32, gutter: f32) -> Self {
        Self {
            column_width,
            gutter,
            ..Default::default()
        }
    }

    /// Tighter grid used on single-album pages.
    pub fn album() -> Self {
        Self::new(280.0, 12.0)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.column_width.is_finite() && self.column_width > 0.0) {
            return Err(LayoutError::Configuration(format!(
                "column width must be positive, got {}",
                self.column_width
            )));
        }
        if !(self.gutter.is_finite() && self.gutter >= 0.0) {
            return Err(LayoutError::Configuration(format!(
                "gutter must be non-negative, got {}",
                self.gutter
            )));
        }
        if !(self.min_image_height > 0.0 && self.min_image_height <= self.max_image_height) {
            return Err(LayoutError::Configuration(format!(
                "image height bounds are inconsistent: [{}, {}]",
                self.min_image_height, self.max_image_height
            )));
        }
        if !(self.fallback_image_height > 0.0) {
            return Err(LayoutError::Configuration(format!(
                "fallback image height must be positive, got {}",
                self.fallback_image_height
            )));
        }
        Ok(())
    }

    pub fn bounds(&self) -> HeightBounds {
        HeightBounds {
            min: self.min_image_height,
            max: self.max_image_height,
            fallback: self.fallback_image_height,
        }
    }

    pub fn metrics_for(&self, container: Container) -> ColumnMetrics {
        ColumnMetrics::compute(
            container.width,
            container.padding,
            self.column_width,
            self.gutter,
        )
    }
}
