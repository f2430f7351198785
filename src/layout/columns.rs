//! Column arithmetic for the masonry grid.

/// Upper bound on the column count, whatever the container width.
pub const MAX_COLUMNS: usize = 256;

/// Column count and width derived from a container width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnMetrics {
    pub count: usize,
    /// Actual column width; columns plus gutters fill the container exactly.
    pub column_width: f32,
    pub gutter: f32,
}

impl ColumnMetrics {
    /// Fits as many `target_width` columns as the padded container allows.
    ///
    /// `count = max(1, floor((width - 2*padding) / (target + gutter)))`, then the
    /// leftover space is spread across the columns. The count is capped at
    /// [`MAX_COLUMNS`]; a non-finite ratio yields a single column.
    pub fn compute(container_width: f32, padding: f32, target_width: f32, gutter: f32) -> Self {
        let available = container_width - padding * 2.0;
        let ratio = available / (target_width + gutter);
        let count = if ratio.is_finite() {
            ratio.floor().clamp(1.0, MAX_COLUMNS as f32) as usize
        } else {
            1
        };
        let total_gutter = (count - 1) as f32 * gutter;
        let column_width = ((available - total_gutter) / count as f32).max(0.0);
        Self {
            count,
            column_width,
            gutter,
        }
    }

    pub fn column_x(&self, column: usize) -> f32 {
        column as f32 * (self.column_width + self.gutter)
    }
}

/// Running heights of each column during a layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnState {
    heights: Vec<f32>,
}

impl ColumnState {
    pub fn new(count: usize) -> Self {
        Self {
            heights: vec![0.0; count.max(1)],
        }
    }

    pub fn reset(&mut self, count: usize) {
        self.heights.clear();
        self.heights.resize(count.max(1), 0.0);
    }

    /// Index of the shortest column. Ties go to the lowest index.
    pub fn shortest(&self) -> usize {
        let mut best = 0;
        for (i, h) in self.heights.iter().enumerate().skip(1) {
            if *h < self.heights[best] {
                best = i;
            }
        }
        best
    }

    pub fn height(&self, column: usize) -> f32 {
        self.heights.get(column).copied().unwrap_or(0.0)
    }

    /// Adds a finalized item (and its trailing gutter) to a column.
    pub fn advance(&mut self, column: usize, item_height: f32, gutter: f32) {
        if let Some(h) = self.heights.get_mut(column) {
            *h += item_height + gutter;
        }
    }

    pub fn tallest(&self) -> f32 {
        self.heights.iter().copied().fold(0.0f32, f32::max)
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}
