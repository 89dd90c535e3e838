use image::{Rgba, RgbaImage};

use crate::consts::{PLACEHOLDER_DEFAULT_SIZE, PLACEHOLDER_LOADING_GRAY};
use crate::geometry::ViewportSize;

/// Flat dark grey image shown while a pyramid is still being built.
///
/// Each side follows the viewport but never exceeds `max_side`.
pub fn loading(viewport: Option<ViewportSize>, max_side: u32) -> RgbaImage {
    let g = PLACEHOLDER_LOADING_GRAY;
    flat(viewport, max_side, Rgba([g, g, g, 255]))
}

/// Flat red image shown when loading or building failed.
pub fn error(viewport: Option<ViewportSize>, max_side: u32) -> RgbaImage {
    flat(viewport, max_side, Rgba([255, 0, 0, 255]))
}

fn flat(viewport: Option<ViewportSize>, max_side: u32, color: Rgba<u8>) -> RgbaImage {
    let max_side = max_side.max(1);
    let (w, h) = match viewport {
        Some(v) if v.is_usable() => (side(v.width, max_side), side(v.height, max_side)),
        _ => {
            let d = PLACEHOLDER_DEFAULT_SIZE.min(max_side);
            (d, d)
        }
    };
    RgbaImage::from_pixel(w, h, color)
}

fn side(length: f64, max_side: u32) -> u32 {
    length.ceil().clamp(1.0, f64::from(max_side)) as u32
}
