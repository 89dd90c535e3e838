//! The zoom/pan anchor.
//!
//! A [`Datum`] pairs one device-space point with one full-resolution image
//! point and a device:image scale. A device point `P` maps to full-image
//! coordinates as `(P - device_point) / scale + image_point`; the active
//! pyramid level's own pixel coordinates are that divided by `2^level`.
//! Results are rounded to the nearest pixel.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::LEVEL_ROUNDING_BIAS;
use crate::error::{PanZoomError, Result};
use crate::geometry::{DevicePoint, ImagePoint, ImageSize, ViewportSize};
use crate::pyramid::Pyramid;
use crate::ticks::{clamp_ticks, quantize_scale, ticks_to_scale};

/// The device/image point pair a datum is pinned to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Full-resolution image pixel.
    pub image_point: ImagePoint,
    /// Where that pixel sits in the viewport.
    pub device_point: DevicePoint,
}

/// Plain copy of every datum field, for pushing one view into another.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatumSnapshot {
    pub anchor: Option<Anchor>,
    pub scale: f64,
    pub ticks: i32,
    pub sensitivity: u32,
    pub level: usize,
    pub pyramid_height: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Datum {
    anchor: Option<Anchor>,
    scale: f64,
    ticks: i32,
    sensitivity: u32,
    level: usize,
    pyramid_height: usize,
    full_size: ImageSize,
}

impl Datum {
    /// A datum with no anchor yet. Conversions fail with
    /// [`PanZoomError::NotReady`] until it is fitted or given a snapshot.
    pub fn new(full_size: ImageSize, pyramid_height: usize, sensitivity: u32) -> Result<Self> {
        if sensitivity == 0 {
            return Err(PanZoomError::InvalidSensitivity(sensitivity));
        }
        if full_size.width == 0 || full_size.height == 0 {
            return Err(PanZoomError::InvalidDimensions {
                width: full_size.width,
                height: full_size.height,
            });
        }
        Ok(Self {
            anchor: None,
            scale: 1.0,
            ticks: 0,
            sensitivity,
            level: 0,
            pyramid_height: pyramid_height.max(1),
            full_size,
        })
    }

    pub fn for_pyramid(pyramid: &Pyramid, sensitivity: u32) -> Result<Self> {
        Self::new(pyramid.full_size(), pyramid.height(), sensitivity)
    }

    pub fn is_ready(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn ticks(&self) -> i32 {
        self.ticks
    }

    pub fn sensitivity(&self) -> u32 {
        self.sensitivity
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn pyramid_height(&self) -> usize {
        self.pyramid_height
    }

    pub fn full_size(&self) -> ImageSize {
        self.full_size
    }

    /// Pyramid level for a display scale:
    /// `clamp(floor(-log2(scale) + 0.5), 0, pyramid_height - 1)`.
    pub fn level_for_scale(&self, scale: f64) -> usize {
        let max_level = (self.pyramid_height - 1) as f64;
        let raw = (-scale.log2() + LEVEL_ROUNDING_BIAS).floor();
        if raw.is_nan() {
            return 0;
        }
        raw.clamp(0.0, max_level) as usize
    }

    /// Largest tick-quantised scale at which the whole image fits, anchored
    /// centre to centre.
    pub fn fit_to_viewport(&mut self, viewport: ViewportSize) -> Result<()> {
        if !viewport.is_usable() {
            return Err(degenerate(viewport));
        }
        let fit = (viewport.width / f64::from(self.full_size.width))
            .min(viewport.height / f64::from(self.full_size.height));
        let (ticks, scale) = quantize_scale(fit, self.sensitivity);

        self.anchor = Some(Anchor {
            image_point: self.full_size.center(),
            device_point: viewport.center(),
        });
        self.set_ticks(ticks, scale);
        debug!(scale, ticks, level = self.level, "Datum fitted to viewport");
        Ok(())
    }

    /// Device point to the active level's pixel coordinates.
    pub fn device_to_image(&self, point: DevicePoint) -> Result<ImagePoint> {
        let (x, y) = self.device_to_full_f64(point)?;
        let power = f64::from(1u32 << self.level.min(31));
        Ok(round_point(x / power, y / power))
    }

    /// Device point to full-resolution (level 0) pixel coordinates.
    pub fn device_to_full_image(&self, point: DevicePoint) -> Result<ImagePoint> {
        let (x, y) = self.device_to_full_f64(point)?;
        Ok(round_point(x, y))
    }

    /// Full-resolution pixel to device coordinates.
    pub fn image_to_device(&self, point: ImagePoint) -> Result<DevicePoint> {
        let anchor = self.anchor.ok_or(PanZoomError::NotReady)?;
        Ok(DevicePoint::new(
            (point.x - anchor.image_point.x) as f64 * self.scale + anchor.device_point.x,
            (point.y - anchor.image_point.y) as f64 * self.scale + anchor.device_point.y,
        ))
    }

    /// Zoom about `point`: the image pixel under `point` (under the current
    /// anchor) stays under `point` at the new, tick-quantised scale.
    pub fn reanchor(&mut self, point: DevicePoint, new_scale: f64) -> Result<()> {
        if !new_scale.is_finite() || new_scale <= 0.0 {
            return Err(PanZoomError::InvalidScale(new_scale));
        }
        let (ticks, _) = quantize_scale(new_scale, self.sensitivity);
        self.reanchor_ticks(point, ticks)
    }

    /// Step one tick in the direction of `direction`'s sign. Zero keeps the
    /// scale but still moves the anchor to `point`.
    pub fn scale_by_tick(&mut self, point: DevicePoint, direction: f64) -> Result<()> {
        let step = if direction > 0.0 {
            1
        } else if direction < 0.0 {
            -1
        } else {
            0
        };
        self.reanchor_ticks(point, self.ticks.saturating_add(step))
    }

    /// Multiply the scale by `factor` (quantised) and zoom about `point`.
    pub fn change_scale_by_factor(&mut self, point: DevicePoint, factor: f64) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(PanZoomError::InvalidScale(factor));
        }
        self.reanchor(point, self.scale * factor)
    }

    /// Drag: pin `image_point_at_drag_start` under the live cursor.
    pub fn pan_to(&mut self, point: DevicePoint, image_point_at_drag_start: ImagePoint) -> Result<()> {
        if self.anchor.is_none() {
            return Err(PanZoomError::NotReady);
        }
        self.anchor = Some(Anchor {
            image_point: image_point_at_drag_start,
            device_point: point,
        });
        Ok(())
    }

    pub fn snapshot(&self) -> DatumSnapshot {
        DatumSnapshot {
            anchor: self.anchor,
            scale: self.scale,
            ticks: self.ticks,
            sensitivity: self.sensitivity,
            level: self.level,
            pyramid_height: self.pyramid_height,
        }
    }

    /// Copy another view's datum into this one. The level is clamped to this
    /// datum's pyramid; a zero sensitivity in the snapshot keeps ours.
    pub fn apply_snapshot(&mut self, snapshot: &DatumSnapshot) -> Result<()> {
        if !snapshot.scale.is_finite() || snapshot.scale <= 0.0 {
            return Err(PanZoomError::InvalidScale(snapshot.scale));
        }
        self.anchor = snapshot.anchor;
        self.scale = snapshot.scale;
        self.ticks = snapshot.ticks;
        if snapshot.sensitivity > 0 {
            self.sensitivity = snapshot.sensitivity;
        }
        self.level = snapshot.level.min(self.pyramid_height - 1);
        Ok(())
    }

    fn reanchor_ticks(&mut self, point: DevicePoint, ticks: i32) -> Result<()> {
        let ticks = clamp_ticks(ticks, self.sensitivity);
        let image_point = self.device_to_full_image(point)?;
        self.anchor = Some(Anchor {
            image_point,
            device_point: point,
        });
        self.set_ticks(ticks, ticks_to_scale(ticks, self.sensitivity));
        debug!(
            x = image_point.x,
            y = image_point.y,
            scale = self.scale,
            level = self.level,
            "Datum re-anchored"
        );
        Ok(())
    }

    fn set_ticks(&mut self, ticks: i32, scale: f64) {
        self.ticks = ticks;
        self.scale = scale;
        self.level = self.level_for_scale(scale);
    }

    fn device_to_full_f64(&self, point: DevicePoint) -> Result<(f64, f64)> {
        let anchor = self.anchor.ok_or(PanZoomError::NotReady)?;
        Ok((
            (point.x - anchor.device_point.x) / self.scale + anchor.image_point.x as f64,
            (point.y - anchor.device_point.y) / self.scale + anchor.image_point.y as f64,
        ))
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(anchor) = self.anchor else {
            return write!(f, "Datum: no anchor set yet");
        };
        write!(
            f,
            "Datum: device {:.1},{:.1} | image {},{} | scale {:.3} ({} ticks @ {} per octave) | level {}/{}",
            anchor.device_point.x,
            anchor.device_point.y,
            anchor.image_point.x,
            anchor.image_point.y,
            self.scale,
            self.ticks,
            self.sensitivity,
            self.level,
            self.pyramid_height
        )
    }
}

fn round_point(x: f64, y: f64) -> ImagePoint {
    ImagePoint::new((x + 0.5).floor() as i64, (y + 0.5).floor() as i64)
}

fn degenerate(viewport: ViewportSize) -> PanZoomError {
    PanZoomError::DegenerateViewport {
        width: viewport.width as i64,
        height: viewport.height as i64,
    }
}
