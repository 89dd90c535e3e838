#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use panzoom_core::config::PyramidOptions;
use panzoom_core::pyramid::Pyramid;

/// Image whose pixels encode their own coordinates, so crops can be
/// checked against the source position.
pub fn coordinate_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x / 256) * 16 + y / 256) as u8, 255])
    })
}

pub fn flat_image(width: u32, height: u32, value: u8) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
}

/// Pyramid over a coordinate image with the given minimum dimension.
pub fn make_pyramid(width: u32, height: u32, min_dimension: u32) -> Pyramid {
    Pyramid::from_rgba(
        coordinate_image(width, height),
        &PyramidOptions::with_min_dimension(min_dimension),
    )
    .expect("build pyramid")
}

/// Write an image to a temporary PNG and return the handle.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_temp_png(image: &RgbaImage) -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("create temp file");
    image
        .save_with_format(file.path(), image::ImageFormat::Png)
        .expect("write PNG");
    file
}
