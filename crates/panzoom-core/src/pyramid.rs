//! Multi-resolution image pyramid.
//!
//! Level 0 is an owned copy of the source, normalised to RGBA8. Every
//! following level is `floor(w/2) x floor(h/2)` of the previous one,
//! produced with an anti-aliasing filter. Levels are added while the
//! smaller side of the last level is above the minimum dimension.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use tracing::{debug, info};

use crate::config::{PyramidFilter, PyramidOptions};
use crate::error::{PanZoomError, Result};
use crate::filters::gaussian_blur::blur_and_halve;
use crate::geometry::ImageSize;

/// An immutable stack of progressively half-resolution images.
#[derive(Clone, Debug)]
pub struct Pyramid {
    levels: Vec<RgbaImage>,
}

impl Pyramid {
    /// Build a pyramid from any decoded image.
    pub fn build(source: &DynamicImage, options: &PyramidOptions) -> Result<Self> {
        Self::from_rgba(source.to_rgba8(), options)
    }

    /// Build a pyramid taking ownership of an RGBA8 buffer as level 0.
    pub fn from_rgba(base: RgbaImage, options: &PyramidOptions) -> Result<Self> {
        Self::build_cancellable(base, options, &AtomicBool::new(false))
    }

    /// Like [`Pyramid::from_rgba`], but stops between levels once `cancel`
    /// is set.
    pub fn build_cancellable(
        base: RgbaImage,
        options: &PyramidOptions,
        cancel: &AtomicBool,
    ) -> Result<Self> {
        let (width, height) = base.dimensions();
        if width == 0 || height == 0 {
            return Err(PanZoomError::InvalidDimensions { width, height });
        }
        let min_dimension = options.effective_min_dimension();
        if width.min(height) < min_dimension {
            return Err(PanZoomError::ImageTooSmall {
                width,
                height,
                min_dimension,
            });
        }

        let mut levels = vec![base];
        loop {
            let last = &levels[levels.len() - 1];
            let (w, h) = last.dimensions();
            if w.min(h) <= min_dimension {
                break;
            }
            if cancel.load(Ordering::Relaxed) {
                return Err(PanZoomError::Cancelled);
            }
            let next = halve(last, options.filter);
            debug!(
                level = levels.len(),
                width = next.width(),
                height = next.height(),
                "Pyramid level built"
            );
            levels.push(next);
        }

        info!(
            width,
            height,
            levels = levels.len(),
            filter = %options.filter,
            "Pyramid built"
        );
        Ok(Self { levels })
    }

    /// Number of levels; always at least 1.
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, index: usize) -> Option<&RgbaImage> {
        self.levels.get(index)
    }

    /// Level `index`, clamped into `[0, height-1]`.
    pub fn level_clamped(&self, index: usize) -> &RgbaImage {
        &self.levels[self.clamp_level(index)]
    }

    pub fn clamp_level(&self, index: usize) -> usize {
        index.min(self.levels.len() - 1)
    }

    pub fn full_resolution(&self) -> &RgbaImage {
        &self.levels[0]
    }

    pub fn full_size(&self) -> ImageSize {
        let (w, h) = self.levels[0].dimensions();
        ImageSize::new(w, h)
    }

    pub fn level_sizes(&self) -> Vec<ImageSize> {
        self.levels
            .iter()
            .map(|l| ImageSize::new(l.width(), l.height()))
            .collect()
    }

    /// Formatter that marks `active` in the level listing.
    pub fn describe(&self, active: Option<usize>) -> PyramidSummary<'_> {
        PyramidSummary {
            pyramid: self,
            active,
        }
    }
}

impl fmt::Display for Pyramid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(None).fmt(f)
    }
}

pub struct PyramidSummary<'a> {
    pyramid: &'a Pyramid,
    active: Option<usize>,
}

impl fmt::Display for PyramidSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pyramid: {} levels", self.pyramid.height())?;
        for (i, size) in self.pyramid.level_sizes().iter().enumerate() {
            write!(f, "Level {i:2} : {:5} x {:5}", size.width, size.height)?;
            if self.active == Some(i) {
                write!(f, " (active)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn halve(image: &RgbaImage, filter: PyramidFilter) -> RgbaImage {
    let (w, h) = (image.width() / 2, image.height() / 2);
    match filter {
        PyramidFilter::Gaussian { sigma } => blur_and_halve(image, sigma),
        PyramidFilter::Triangle => imageops::resize(image, w, h, FilterType::Triangle),
        PyramidFilter::CatmullRom => imageops::resize(image, w, h, FilterType::CatmullRom),
        PyramidFilter::Lanczos3 => imageops::resize(image, w, h, FilterType::Lanczos3),
    }
}
