//! One pan/zoom engine per displayed image.
//!
//! Owns the pyramid, the datum, the current viewport size and any drag in
//! progress. Every mutating call returns a [`ViewChange`] for the caller to
//! forward (status bars, synchronised views); the engine itself never
//! broadcasts.

use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::config::ViewerConfig;
use crate::datum::{Datum, DatumSnapshot};
use crate::error::{PanZoomError, Result};
use crate::extract::{extract_loupe, extract_viewport, ViewportImage};
use crate::geometry::{DevicePoint, ImagePoint, ImageSize, ViewportSize};
use crate::pyramid::Pyramid;
use crate::status::StatusReport;

/// What a mutation did to the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewChange {
    pub previous_level: usize,
    pub snapshot: DatumSnapshot,
}

impl ViewChange {
    pub fn level(&self) -> usize {
        self.snapshot.level
    }

    pub fn scale(&self) -> f64 {
        self.snapshot.scale
    }

    pub fn level_changed(&self) -> bool {
        self.previous_level != self.snapshot.level
    }
}

#[derive(Clone, Copy, Debug)]
struct Drag {
    image_point: ImagePoint,
}

pub struct Engine {
    pyramid: Pyramid,
    datum: Datum,
    viewport: Option<ViewportSize>,
    drag: Option<Drag>,
    max_crop_dimension: u32,
    loupe_size: ImageSize,
}

impl Engine {
    pub fn new(pyramid: Pyramid, config: &ViewerConfig) -> Result<Self> {
        let config = config.validated();
        let datum = Datum::for_pyramid(&pyramid, config.sensitivity)?;
        Ok(Self {
            pyramid,
            datum,
            viewport: None,
            drag: None,
            max_crop_dimension: config.max_crop_dimension,
            loupe_size: config.loupe_size,
        })
    }

    pub fn from_image(image: &DynamicImage, config: &ViewerConfig) -> Result<Self> {
        let pyramid = Pyramid::build(image, &config.validated().pyramid_options())?;
        Self::new(pyramid, config)
    }

    pub fn pyramid(&self) -> &Pyramid {
        &self.pyramid
    }

    pub fn datum(&self) -> &Datum {
        &self.datum
    }

    pub fn viewport(&self) -> Option<ViewportSize> {
        self.viewport
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// New viewport size from the host's resize callback; refits the image.
    pub fn resize(&mut self, viewport: ViewportSize) -> Result<ViewChange> {
        let change = self.mutate(|datum| datum.fit_to_viewport(viewport))?;
        self.viewport = Some(viewport);
        debug!(width = viewport.width, height = viewport.height, "Viewport resized");
        Ok(change)
    }

    /// Fit the whole image into the current viewport.
    pub fn fit(&mut self) -> Result<ViewChange> {
        let viewport = self.viewport.ok_or(PanZoomError::NotReady)?;
        self.mutate(|datum| datum.fit_to_viewport(viewport))
    }

    /// One scroll notch at `point`; the sign of `delta` picks the direction.
    pub fn scroll(&mut self, point: DevicePoint, delta: f64) -> Result<ViewChange> {
        self.mutate(|datum| datum.scale_by_tick(point, delta))
    }

    pub fn zoom_by_factor(&mut self, point: DevicePoint, factor: f64) -> Result<ViewChange> {
        self.mutate(|datum| datum.change_scale_by_factor(point, factor))
    }

    /// Zoom about `point` to an explicit (quantised) scale.
    pub fn zoom_to(&mut self, point: DevicePoint, scale: f64) -> Result<ViewChange> {
        self.mutate(|datum| datum.reanchor(point, scale))
    }

    /// Zoom by `factor` about the viewport centre.
    pub fn zoom_centered(&mut self, factor: f64) -> Result<ViewChange> {
        let viewport = self.viewport.ok_or(PanZoomError::NotReady)?;
        self.zoom_by_factor(viewport.center(), factor)
    }

    /// Remember the full-resolution pixel under `point` for a drag.
    pub fn begin_drag(&mut self, point: DevicePoint) -> Result<()> {
        let image_point = self.datum.device_to_full_image(point)?;
        self.drag = Some(Drag { image_point });
        Ok(())
    }

    /// Move the drag to `point`; `None` when no drag is in progress.
    pub fn drag_to(&mut self, point: DevicePoint) -> Result<Option<ViewChange>> {
        let Some(drag) = self.drag else {
            return Ok(None);
        };
        self.mutate(|datum| datum.pan_to(point, drag.image_point))
            .map(Some)
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn snapshot(&self) -> DatumSnapshot {
        self.datum.snapshot()
    }

    pub fn apply_snapshot(&mut self, snapshot: &DatumSnapshot) -> Result<ViewChange> {
        self.mutate(|datum| datum.apply_snapshot(snapshot))
    }

    /// Put back a viewport and datum captured before a mutation.
    pub(crate) fn restore(
        &mut self,
        viewport: Option<ViewportSize>,
        snapshot: &DatumSnapshot,
    ) -> Result<()> {
        self.datum.apply_snapshot(snapshot)?;
        self.viewport = viewport;
        Ok(())
    }

    /// Crop for the current viewport.
    pub fn current_image(&self) -> Result<ViewportImage> {
        let viewport = self.viewport.ok_or(PanZoomError::NotReady)?;
        self.image_for(viewport)
    }

    /// Crop for an explicit viewport size, leaving the stored one alone.
    pub fn image_for(&self, viewport: ViewportSize) -> Result<ViewportImage> {
        extract_viewport(&self.pyramid, &self.datum, viewport, self.max_crop_dimension)
    }

    /// Full-resolution window around the pixel under `point`.
    pub fn loupe_at(&self, point: DevicePoint) -> Result<RgbaImage> {
        let center = self.datum.device_to_full_image(point)?;
        extract_loupe(&self.pyramid, center, self.loupe_size, self.max_crop_dimension)
    }

    /// Full-resolution extent between the viewport's corners.
    pub fn visible_full_extent(&self) -> Result<ImageSize> {
        let viewport = self.viewport.ok_or(PanZoomError::NotReady)?;
        let tl = self.datum.device_to_full_image(DevicePoint::new(0.0, 0.0))?;
        let br = self
            .datum
            .device_to_full_image(DevicePoint::new(viewport.width, viewport.height))?;
        Ok(ImageSize::new(
            (br.x - tl.x).max(0) as u32,
            (br.y - tl.y).max(0) as u32,
        ))
    }

    pub fn status(&self, cursor: Option<DevicePoint>, pixel_count: u64) -> StatusReport {
        let cursor = cursor.and_then(|p| {
            self.datum
                .device_to_full_image(p)
                .ok()
                .map(|image_point| (p, image_point))
        });
        StatusReport {
            level: self.datum.level(),
            scale: self.datum.scale(),
            pixel_count,
            cursor,
            full_view: self.visible_full_extent().ok(),
        }
    }

    /// Run `op` on the datum; on failure the datum is left untouched.
    fn mutate(&mut self, op: impl FnOnce(&mut Datum) -> Result<()>) -> Result<ViewChange> {
        let previous_level = self.datum.level();
        let mut next = self.datum.clone();
        op(&mut next)?;
        self.datum = next;
        Ok(self.change_from(previous_level))
    }

    fn change_from(&self, previous_level: usize) -> ViewChange {
        ViewChange {
            previous_level,
            snapshot: self.datum.snapshot(),
        }
    }
}
