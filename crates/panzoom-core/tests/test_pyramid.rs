mod common;

use std::sync::atomic::AtomicBool;

use image::DynamicImage;
use panzoom_core::config::{PyramidFilter, PyramidOptions};
use panzoom_core::error::PanZoomError;
use panzoom_core::geometry::ImageSize;
use panzoom_core::pyramid::Pyramid;

use common::{coordinate_image, flat_image, make_pyramid};

// ---------------------------------------------------------------------------
// Level sizes
// ---------------------------------------------------------------------------

#[test]
fn test_pyramid_1000x800_floor_100() {
    let p = make_pyramid(1000, 800, 100);
    assert_eq!(
        p.level_sizes(),
        vec![
            ImageSize::new(1000, 800),
            ImageSize::new(500, 400),
            ImageSize::new(250, 200),
            ImageSize::new(125, 100),
        ]
    );
}

#[test]
fn test_pyramid_each_level_halves_with_floor() {
    for &(w, h) in &[(1001, 777), (640, 480), (333, 999), (257, 64)] {
        let p = make_pyramid(w, h, 32);
        let sizes = p.level_sizes();
        for pair in sizes.windows(2) {
            assert_eq!(pair[1].width, pair[0].width / 2, "{w}x{h}");
            assert_eq!(pair[1].height, pair[0].height / 2, "{w}x{h}");
        }
        // Stops once the smaller side is at or below the minimum.
        let last = sizes.last().unwrap();
        assert!(last.min_side() <= 32 || sizes.len() == 1);
        if sizes.len() > 1 {
            assert!(sizes[sizes.len() - 2].min_side() > 32);
        }
    }
}

#[test]
fn test_pyramid_level_zero_equals_source() {
    let src = coordinate_image(300, 200);
    let p = Pyramid::from_rgba(src.clone(), &PyramidOptions::default()).unwrap();
    assert_eq!(p.full_resolution(), &src);
    assert_eq!(p.level(0).unwrap().as_raw(), src.as_raw());
}

#[test]
fn test_pyramid_build_from_dynamic_image_normalises_to_rgba() {
    let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(64, 64, image::Luma([90])));
    let p = Pyramid::build(&gray, &PyramidOptions::default()).unwrap();
    assert_eq!(p.height(), 2);
    assert_eq!(p.full_resolution().get_pixel(3, 3).0, [90, 90, 90, 255]);
}

#[test]
fn test_pyramid_min_dimension_clamped_to_32() {
    // A request for 4 behaves like 32.
    let p = make_pyramid(256, 256, 4);
    assert_eq!(p.level_sizes().last().unwrap(), &ImageSize::new(32, 32));
    assert_eq!(p.height(), 4);
}

// ---------------------------------------------------------------------------
// Small / empty inputs
// ---------------------------------------------------------------------------

#[test]
fn test_pyramid_too_small_errors() {
    let result = Pyramid::from_rgba(flat_image(20, 100, 1), &PyramidOptions::default());
    match result {
        Err(PanZoomError::ImageTooSmall {
            width,
            height,
            min_dimension,
        }) => {
            assert_eq!((width, height, min_dimension), (20, 100, 32));
        }
        other => panic!("expected ImageTooSmall, got {other:?}"),
    }
}

#[test]
fn test_pyramid_exactly_minimum_is_single_level() {
    let p = Pyramid::from_rgba(flat_image(32, 500, 1), &PyramidOptions::default()).unwrap();
    assert_eq!(p.height(), 1);
}

#[test]
fn test_pyramid_empty_image_errors() {
    let result = Pyramid::from_rgba(image::RgbaImage::new(0, 10), &PyramidOptions::default());
    assert!(matches!(
        result,
        Err(PanZoomError::InvalidDimensions { width: 0, height: 10 })
    ));
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[test]
fn test_pyramid_flat_image_stays_flat_with_every_filter() {
    let filters = [
        PyramidFilter::default(),
        PyramidFilter::Triangle,
        PyramidFilter::CatmullRom,
        PyramidFilter::Lanczos3,
    ];
    for filter in filters {
        let options = PyramidOptions {
            min_dimension: 32,
            filter,
        };
        let p = Pyramid::from_rgba(flat_image(128, 96, 200), &options).unwrap();
        assert_eq!(p.height(), 3, "{filter}");
        for level in 1..p.height() {
            for px in p.level(level).unwrap().pixels() {
                assert!((i16::from(px[0]) - 200).abs() <= 1, "{filter}: {:?}", px);
            }
        }
    }
}

#[test]
fn test_pyramid_is_deterministic() {
    let a = make_pyramid(200, 150, 32);
    let b = make_pyramid(200, 150, 32);
    for i in 0..a.height() {
        assert_eq!(a.level(i).unwrap(), b.level(i).unwrap());
    }
}

// ---------------------------------------------------------------------------
// Access and cancellation
// ---------------------------------------------------------------------------

#[test]
fn test_pyramid_level_clamped() {
    let p = make_pyramid(128, 128, 32);
    assert_eq!(p.height(), 3);
    assert_eq!(p.clamp_level(99), 2);
    assert_eq!(p.level_clamped(99).dimensions(), (32, 32));
    assert!(p.level(3).is_none());
}

#[test]
fn test_pyramid_cancelled_before_first_halving() {
    let cancel = AtomicBool::new(true);
    let result = Pyramid::build_cancellable(flat_image(512, 512, 0), &PyramidOptions::default(), &cancel);
    assert!(matches!(result, Err(PanZoomError::Cancelled)));
}

#[test]
fn test_pyramid_display_lists_levels() {
    let p = make_pyramid(128, 64, 32);
    let text = p.describe(Some(1)).to_string();
    assert!(text.starts_with("Pyramid: 2 levels"));
    assert!(text.contains("Level  1 :    64 x    32 (active)"));
}
