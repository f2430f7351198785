//! Worker pool that reads image dimensions from disk.
//!
//! - Bounded worker pool (1-4 threads)
//! - Each request gets an `ImageHandle` immediately; a worker completes the
//!   matching `DecodeSignal` once the header has been read
//! - Uses flume for handing jobs to the workers

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context;
use flume::{Receiver, Sender};
use tracing::{debug, trace, warn};

use super::ImageSource;
use crate::image_loader::{read_dimensions, resolve_asset_path};
use crate::layout::{DecodeSignal, ImageHandle};

/// Default number of worker threads.
const DEFAULT_WORKERS: usize = 2;

/// Maximum number of worker threads.
const MAX_WORKERS: usize = 4;

/// How often idle workers check the shutdown flag.
const IDLE_POLL: Duration = Duration::from_millis(100);

struct DecodeJob {
    path: PathBuf,
    signal: DecodeSignal,
}

/// Decodes images referenced by manifest URLs relative to an asset root.
pub struct DecodeQueue {
    job_tx: Option<Sender<DecodeJob>>,
    /// Kept so jobs left at shutdown can be failed and counted off.
    job_rx: Receiver<DecodeJob>,
    workers: Vec<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    in_flight: Arc<AtomicUsize>,
    root: PathBuf,
}

impl DecodeQueue {
    pub fn new(root: impl Into<PathBuf>, workers: usize) -> anyhow::Result<Self> {
        let root = root.into();
        let num_workers = workers.clamp(1, MAX_WORKERS);
        let (job_tx, job_rx) = flume::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));
        let in_flight = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let rx = job_rx.clone();
            let shutdown = Arc::clone(&shutdown);
            let in_flight = Arc::clone(&in_flight);
            let handle = thread::Builder::new()
                .name(format!("decode-worker-{}", worker_id))
                .spawn(move || worker_loop(worker_id, rx, shutdown, in_flight))
                .context("Failed to spawn decode worker")?;
            handles.push(handle);
        }

        debug!(num_workers, root = ?root, "Started decode queue");

        Ok(Self {
            job_tx: Some(job_tx),
            job_rx,
            workers: handles,
            shutdown,
            in_flight,
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Requests not yet completed.
    pub fn pending_count(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Stops the workers. Queued requests read as decode failures.
    pub fn shutdown(&mut self) {
        debug!("Shutting down decode queue");
        self.shutdown.store(true, Ordering::SeqCst);
        self.job_tx.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        let mut abandoned = 0usize;
        for job in self.job_rx.drain() {
            job.signal.failed();
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            abandoned += 1;
        }
        debug!(abandoned, "Decode queue shutdown complete");
    }
}

impl ImageSource for DecodeQueue {
    fn request(&self, url: &str) -> ImageHandle {
        let (signal, handle) = ImageHandle::pending();

        let Some(path) = resolve_asset_path(&self.root, url) else {
            warn!(url, "Image URL does not resolve under the asset root");
            signal.failed();
            return handle;
        };
        let Some(job_tx) = self.job_tx.as_ref() else {
            warn!(url, "Decode queue is shut down");
            signal.failed();
            return handle;
        };

        self.in_flight.fetch_add(1, Ordering::Relaxed);
        if let Err(flume::SendError(job)) = job_tx.send(DecodeJob { path, signal }) {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            warn!(url, "Decode workers are gone");
            job.signal.failed();
        }
        handle
    }
}

impl Drop for DecodeQueue {
    fn drop(&mut self) {
        if !self.shutdown.load(Ordering::Relaxed) {
            self.shutdown();
        }
    }
}

fn worker_loop(
    worker_id: usize,
    rx: Receiver<DecodeJob>,
    shutdown: Arc<AtomicBool>,
    in_flight: Arc<AtomicUsize>,
) {
    debug!(worker_id, "Decode worker started");

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match rx.recv_timeout(IDLE_POLL) {
            Ok(job) => {
                process_job(job);
                in_flight.fetch_sub(1, Ordering::Relaxed);
            }
            Err(flume::RecvTimeoutError::Timeout) => continue,
            Err(flume::RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!(worker_id, "Decode worker stopped");
}

fn process_job(job: DecodeJob) {
    trace!(path = ?job.path, "Reading image dimensions");
    match read_dimensions(&job.path) {
        Ok((width, height)) => job.signal.decoded(width, height),
        Err(e) => {
            warn!(path = ?job.path, error = ?e, "Failed to decode image");
            job.signal.failed();
        }
    }
}

/// Builder for DecodeQueue with configuration options.
pub struct DecodeQueueBuilder {
    workers: usize,
    root: PathBuf,
}

impl DecodeQueueBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            root: root.into(),
        }
    }

    pub fn workers(mut self, count: usize) -> Self {
        self.workers = count;
        self
    }

    pub fn build(self) -> anyhow::Result<DecodeQueue> {
        DecodeQueue::new(self.root, self.workers)
    }
}
