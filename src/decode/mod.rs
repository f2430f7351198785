//! Host-side image decoding.
//!
//! The layout engine only observes [`ImageHandle`]s; whatever loads the pixels
//! implements [`ImageSource`] and completes the matching signal.

pub mod queue;

pub use queue::{DecodeQueue, DecodeQueueBuilder};

use crate::layout::ImageHandle;

/// Starts loading an image and hands back a handle to its decode state.
pub trait ImageSource: Send + Sync {
    fn request(&self, url: &str) -> ImageHandle;
}

impl<F> ImageSource for F
where
    F: Fn(&str) -> ImageHandle + Send + Sync,
{
    fn request(&self, url: &str) -> ImageHandle {
        self(url)
    }
}
