//! Background decode + pyramid construction.
//!
//! A worker thread builds the pyramid and sends exactly one result back
//! over a channel. The handle owns a cancel flag that the build checks
//! between levels; dropping the handle sets it, so a viewer discarded
//! mid-load does not keep a large decode alive.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use image::RgbaImage;
use tracing::{info, warn};

use crate::config::PyramidOptions;
use crate::error::{PanZoomError, Result};
use crate::io::image_io::load_rgba;
use crate::pyramid::Pyramid;

pub struct PyramidLoader;

impl PyramidLoader {
    /// Decode `path` and build its pyramid on a worker thread.
    pub fn spawn(path: &Path, options: PyramidOptions) -> LoadHandle {
        let path = path.to_path_buf();
        Self::spawn_with(move |cancel| {
            if cancel.load(Ordering::Relaxed) {
                return Err(PanZoomError::Cancelled);
            }
            let base = load_rgba(&path)?;
            build(base, &options, cancel, Some(path.as_path()))
        })
    }

    /// Build a pyramid for an already decoded image on a worker thread.
    pub fn spawn_image(image: RgbaImage, options: PyramidOptions) -> LoadHandle {
        Self::spawn_with(move |cancel| build(image, &options, cancel, None))
    }

    fn spawn_with<F>(job: F) -> LoadHandle
    where
        F: FnOnce(&AtomicBool) -> Result<Pyramid> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        thread::spawn(move || {
            let result = job(&flag);
            if let Err(ref e) = result {
                warn!(error = %e, "Pyramid load failed");
            }
            // The receiver may already be gone if the viewer was discarded.
            let _ = tx.send(result);
        });
        LoadHandle {
            rx,
            cancel,
            finished: false,
        }
    }
}

fn build(
    base: RgbaImage,
    options: &PyramidOptions,
    cancel: &AtomicBool,
    path: Option<&Path>,
) -> Result<Pyramid> {
    let pyramid = Pyramid::build_cancellable(base, options, cancel)?;
    if let Some(path) = path {
        info!(path = %path.display(), levels = pyramid.height(), "Image loaded");
    }
    Ok(pyramid)
}

/// Receiving end of a background load.
pub struct LoadHandle {
    rx: Receiver<Result<Pyramid>>,
    cancel: Arc<AtomicBool>,
    finished: bool,
}

impl LoadHandle {
    /// Non-blocking poll. `Some` exactly once, when the worker finishes.
    pub fn try_recv(&mut self) -> Option<Result<Pyramid>> {
        if self.finished {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.finished = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finished = true;
                Some(Err(PanZoomError::LoaderDisconnected))
            }
        }
    }

    /// Block until the worker finishes.
    pub fn wait(mut self) -> Result<Pyramid> {
        if self.finished {
            return Err(PanZoomError::LoaderDisconnected);
        }
        self.finished = true;
        self.rx.recv().map_err(|_| PanZoomError::LoaderDisconnected)?
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        if !self.finished {
            self.cancel();
        }
    }
}
