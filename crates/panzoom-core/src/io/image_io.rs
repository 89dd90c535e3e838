use std::path::Path;

use image::{ImageFormat, RgbaImage};
use tracing::debug;

use crate::error::Result;

/// Decode any supported image file and normalise it to RGBA8.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)?;
    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "Image decoded"
    );
    Ok(img.to_rgba8())
}

/// Save as 8-bit RGBA PNG.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save as 8-bit RGBA TIFF.
pub fn save_tiff(image: &RgbaImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save, choosing the format from the file extension (PNG by default).
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("tiff" | "tif") => save_tiff(image, path),
        _ => save_png(image, path),
    }
}
