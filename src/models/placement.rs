use serde::Serialize;

/// Where one item sits in the masonry grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPlacement {
    pub key: String,
    pub column: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    /// Rendered image height; `None` while the image is still decoding.
    pub height: Option<f32>,
}

impl ItemPlacement {
    pub fn new(key: String, column: usize, x: f32, y: f32, width: f32) -> Self {
        Self {
            key,
            column,
            x,
            y,
            width,
            height: None,
        }
    }

    /// The "loaded" marker: set once the item's height is finalized.
    pub fn is_loaded(&self) -> bool {
        self.height.is_some()
    }

    /// Bottom edge, if finalized.
    pub fn bottom(&self) -> Option<f32> {
        self.height.map(|h| self.y + h)
    }
}
