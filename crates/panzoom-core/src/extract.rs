//! Viewport extraction: a pure crop of the active pyramid level.
//!
//! No resampling happens here. Level selection already picked an image
//! whose resolution is within an octave of the display scale; any final
//! stretch to the viewport is the renderer's job.

use image::RgbaImage;
use tracing::warn;

use crate::consts::RGBA_CHANNEL_COUNT;
use crate::datum::Datum;
use crate::error::{PanZoomError, Result};
use crate::geometry::{DevicePoint, ImagePoint, ImageSize, PixelRect, ViewportSize};
use crate::pyramid::Pyramid;

/// A freshly cropped buffer ready to hand to a renderer.
#[derive(Clone, Debug)]
pub struct ViewportImage {
    pub image: RgbaImage,
    /// Source rectangle in the active level's pixel coordinates.
    pub source_rect: PixelRect,
    /// Area of `source_rect`, for instrumentation.
    pub pixel_count: u64,
    pub level: usize,
}

/// Crop the part of the active level that is visible in `viewport`.
///
/// Fails with [`PanZoomError::DegenerateViewport`] when the viewport is not
/// finite and positive, or the rectangle is empty or wider/taller than
/// `max_dimension`, before allocating anything.
pub fn extract_viewport(
    pyramid: &Pyramid,
    datum: &Datum,
    viewport: ViewportSize,
    max_dimension: u32,
) -> Result<ViewportImage> {
    if !viewport.is_usable() {
        warn!(width = viewport.width, height = viewport.height, "Rejected viewport");
        return Err(PanZoomError::DegenerateViewport {
            width: viewport.width as i64,
            height: viewport.height as i64,
        });
    }
    let top_left = datum.device_to_image(DevicePoint::new(0.0, 0.0))?;
    let bottom_right = datum.device_to_image(DevicePoint::new(viewport.width, viewport.height))?;
    let rect = PixelRect::new(top_left, bottom_right);
    check_rect(&rect, max_dimension)?;

    let level = pyramid.clamp_level(datum.level());
    let image = copy_rect(pyramid.level_clamped(level), &rect);

    Ok(ViewportImage {
        image,
        source_rect: rect,
        pixel_count: (rect.width() * rect.height()) as u64,
        level,
    })
}

/// Full-resolution window of `size` centred on `center`, subject to the
/// same `max_dimension` ceiling as viewport crops.
pub fn extract_loupe(
    pyramid: &Pyramid,
    center: ImagePoint,
    size: ImageSize,
    max_dimension: u32,
) -> Result<RgbaImage> {
    let rect = PixelRect::centered(center, size);
    check_rect(&rect, max_dimension)?;
    Ok(copy_rect(pyramid.full_resolution(), &rect))
}

fn check_rect(rect: &PixelRect, max_dimension: u32) -> Result<()> {
    let (w, h) = (rect.width(), rect.height());
    let max = i64::from(max_dimension);
    if w <= 0 || h <= 0 || w > max || h > max {
        warn!(width = w, height = h, max_dimension, "Rejected crop rectangle");
        return Err(PanZoomError::DegenerateViewport {
            width: w,
            height: h,
        });
    }
    Ok(())
}

/// Copy `rect` out of `source` into a new transparent buffer of the
/// rectangle's size. Areas outside the source stay transparent.
fn copy_rect(source: &RgbaImage, rect: &PixelRect) -> RgbaImage {
    let mut out = RgbaImage::new(rect.width() as u32, rect.height() as u32);
    let src_size = ImageSize::new(source.width(), source.height());
    let Some(visible) = rect.clip_to(src_size) else {
        return out;
    };

    let src_stride = source.width() as usize * RGBA_CHANNEL_COUNT;
    let dst_stride = out.width() as usize * RGBA_CHANNEL_COUNT;
    let row_bytes = visible.width() as usize * RGBA_CHANNEL_COUNT;
    let src_x = visible.min.x as usize * RGBA_CHANNEL_COUNT;
    let dst_x = (visible.min.x - rect.min.x) as usize * RGBA_CHANNEL_COUNT;

    let src = source.as_raw();
    let dst: &mut [u8] = &mut out;
    for y in visible.min.y..visible.max.y {
        let src_start = y as usize * src_stride + src_x;
        let dst_start = (y - rect.min.y) as usize * dst_stride + dst_x;
        dst[dst_start..dst_start + row_bytes].copy_from_slice(&src[src_start..src_start + row_bytes]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 7, 255]))
    }

    #[test]
    fn copy_inside() {
        let src = gradient(20, 20);
        let rect = PixelRect::new(ImagePoint::new(5, 6), ImagePoint::new(9, 8));
        let out = copy_rect(&src, &rect);
        assert_eq!(out.dimensions(), (4, 2));
        assert_eq!(out.get_pixel(0, 0), &Rgba([5, 6, 7, 255]));
        assert_eq!(out.get_pixel(3, 1), &Rgba([8, 7, 7, 255]));
    }

    #[test]
    fn copy_overhanging_leaves_transparent_border() {
        let src = gradient(10, 10);
        let rect = PixelRect::new(ImagePoint::new(-2, -3), ImagePoint::new(4, 4));
        let out = copy_rect(&src, &rect);
        assert_eq!(out.dimensions(), (6, 7));
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(out.get_pixel(2, 3), &Rgba([0, 0, 7, 255]));
        assert_eq!(out.get_pixel(5, 6), &Rgba([3, 3, 7, 255]));
    }

    #[test]
    fn copy_disjoint_is_fully_transparent() {
        let src = gradient(10, 10);
        let rect = PixelRect::new(ImagePoint::new(50, 50), ImagePoint::new(53, 52));
        let out = copy_rect(&src, &rect);
        assert!(out.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn check_rect_bounds() {
        let ok = PixelRect::new(ImagePoint::new(0, 0), ImagePoint::new(10, 10));
        assert!(check_rect(&ok, 10).is_ok());
        assert!(check_rect(&ok, 9).is_err());
        let empty = PixelRect::new(ImagePoint::new(3, 3), ImagePoint::new(3, 9));
        assert!(check_rect(&empty, 100).is_err());
    }
}
