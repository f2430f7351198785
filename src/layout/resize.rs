//! Debounced re-layout on container resize.
//!
//! A resize changes the column count, which invalidates every column
//! assignment, so each burst of resizes ends in one full `relayout()`.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::masonry::MasonryLayout;

/// Quiet period after the last resize before the grid is recomputed.
pub const RESIZE_QUIET_PERIOD: Duration = Duration::from_millis(250);

pub struct ResizeController {
    width_tx: mpsc::UnboundedSender<f32>,
    task: JoinHandle<()>,
}

impl ResizeController {
    /// Starts watching for resizes on the engine's runtime.
    pub fn new(layout: MasonryLayout, quiet_period: Duration) -> Self {
        let (width_tx, width_rx) = mpsc::unbounded_channel();
        let runtime = layout.runtime().clone();
        let task = runtime.spawn(debounce_loop(layout, width_rx, quiet_period));
        debug!(quiet_ms = quiet_period.as_millis() as u64, "started resize controller");
        Self { width_tx, task }
    }

    pub fn with_default_period(layout: MasonryLayout) -> Self {
        Self::new(layout, RESIZE_QUIET_PERIOD)
    }

    /// Reports a new container width.
    pub fn notify(&self, container_width: f32) {
        if self.width_tx.send(container_width).is_err() {
            trace!("resize controller already stopped");
        }
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for ResizeController {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn debounce_loop(
    layout: MasonryLayout,
    mut width_rx: mpsc::UnboundedReceiver<f32>,
    quiet_period: Duration,
) {
    while let Some(mut width) = width_rx.recv().await {
        let mut burst = 1usize;
        loop {
            match tokio::time::timeout(quiet_period, width_rx.recv()).await {
                Ok(Some(next)) => {
                    width = next;
                    burst += 1;
                }
                Ok(None) => break,
                Err(_) => break,
            }
        }
        debug!(width, burst, "container resized, recomputing layout");
        layout.set_container_width(width);
        layout.relayout();
    }
}
