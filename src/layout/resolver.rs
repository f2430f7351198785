//! Image size resolution.
//!
//! An item's rendered height follows its image's natural aspect ratio, which is
//! only known once the image has decoded. Decoding is reported through a
//! [`watch`] channel: the producer holds a one-shot [`DecodeSignal`], the layout
//! engine holds cheap [`ImageHandle`] clones that can be read synchronously or
//! awaited.

use tokio::sync::watch;
use tracing::trace;

/// Lower clamp for image heights.
pub const MIN_IMAGE_HEIGHT: f32 = 150.0;

/// Upper clamp for image heights.
pub const MAX_IMAGE_HEIGHT: f32 = 600.0;

/// Height used when an image fails to decode.
pub const FALLBACK_IMAGE_HEIGHT: f32 = 250.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    Pending,
    Decoded { width: u32, height: u32 },
    Failed,
}

impl DecodeState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Consumer side of an image's decode notification.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    rx: watch::Receiver<DecodeState>,
}

/// Producer side. Completing it consumes it, so it fires at most once;
/// dropping it while pending reads as a decode failure.
#[derive(Debug)]
pub struct DecodeSignal {
    tx: watch::Sender<DecodeState>,
}

impl DecodeSignal {
    pub fn decoded(self, width: u32, height: u32) {
        self.tx.send_replace(DecodeState::Decoded { width, height });
    }

    pub fn failed(self) {
        self.tx.send_replace(DecodeState::Failed);
    }
}

impl ImageHandle {
    /// A handle whose image is still loading.
    pub fn pending() -> (DecodeSignal, ImageHandle) {
        let (tx, rx) = watch::channel(DecodeState::Pending);
        (DecodeSignal { tx }, ImageHandle { rx })
    }

    /// A handle for an image that has already decoded.
    pub fn decoded(width: u32, height: u32) -> Self {
        let (_tx, rx) = watch::channel(DecodeState::Decoded { width, height });
        Self { rx }
    }

    /// A handle for an image that is already known to be broken.
    pub fn failed() -> Self {
        let (_tx, rx) = watch::channel(DecodeState::Failed);
        Self { rx }
    }

    pub fn state(&self) -> DecodeState {
        *self.rx.borrow()
    }

    /// Waits for the first non-pending state.
    ///
    /// A producer that goes away without reporting counts as a failure.
    pub async fn settled(&self) -> DecodeState {
        let mut rx = self.rx.clone();
        let outcome = match rx.wait_for(|s| !s.is_pending()).await {
            Ok(state) => *state,
            Err(_) => DecodeState::Failed,
        };
        outcome
    }
}

/// Clamp and fallback values for image heights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBounds {
    pub min: f32,
    pub max: f32,
    pub fallback: f32,
}

impl Default for HeightBounds {
    fn default() -> Self {
        Self {
            min: MIN_IMAGE_HEIGHT,
            max: MAX_IMAGE_HEIGHT,
            fallback: FALLBACK_IMAGE_HEIGHT,
        }
    }
}

impl HeightBounds {
    /// Rendered height for a decoded image drawn at `width`.
    pub fn natural_height(&self, width: f32, natural_width: u32, natural_height: u32) -> f32 {
        if natural_width == 0 || natural_height == 0 {
            return self.fallback;
        }
        let aspect = natural_height as f32 / natural_width as f32;
        (width * aspect).clamp(self.min, self.max)
    }

    /// Height for a known decode state, or `None` while it is still pending.
    pub fn height_for(&self, width: f32, state: DecodeState) -> Option<f32> {
        match state {
            DecodeState::Pending => None,
            DecodeState::Decoded { width: nw, height: nh } => {
                Some(self.natural_height(width, nw, nh))
            }
            DecodeState::Failed => Some(self.fallback),
        }
    }

    /// Waits for `image` to settle and returns its rendered height.
    pub async fn resolve(&self, image: &ImageHandle, width: f32) -> f32 {
        let state = image.settled().await;
        trace!(?state, width, "image settled");
        match self.height_for(width, state) {
            Some(h) => h,
            None => self.fallback,
        }
    }
}
