mod common;

use approx::assert_relative_eq;
use image::DynamicImage;

use panzoom_core::config::ViewerConfig;
use panzoom_core::engine::Engine;
use panzoom_core::error::PanZoomError;
use panzoom_core::geometry::{DevicePoint, ImagePoint, ImageSize, ViewportSize};

use common::{coordinate_image, make_pyramid};

fn engine_1000x800() -> Engine {
    Engine::new(make_pyramid(1000, 800, 100), &ViewerConfig::default()).unwrap()
}

fn resized_engine() -> Engine {
    let mut engine = engine_1000x800();
    engine.resize(ViewportSize::new(500.0, 400.0)).unwrap();
    engine
}

// ---------------------------------------------------------------------------
// Resize / fit
// ---------------------------------------------------------------------------

#[test]
fn test_engine_resize_fits_and_reports_level_change() {
    let mut engine = engine_1000x800();
    let change = engine.resize(ViewportSize::new(500.0, 400.0)).unwrap();
    assert_eq!(change.previous_level, 0);
    assert_eq!(change.level(), 1);
    assert!(change.level_changed());
    assert_eq!(change.scale(), 0.5);
    assert_eq!(engine.viewport(), Some(ViewportSize::new(500.0, 400.0)));

    let view = engine.current_image().unwrap();
    assert_eq!(&view.image, engine.pyramid().level(1).unwrap());
}

#[test]
fn test_engine_needs_viewport_before_output() {
    let mut engine = engine_1000x800();
    assert!(matches!(engine.current_image(), Err(PanZoomError::NotReady)));
    assert!(matches!(engine.fit(), Err(PanZoomError::NotReady)));
    assert!(matches!(engine.zoom_centered(2.0), Err(PanZoomError::NotReady)));
    assert!(engine.visible_full_extent().is_err());
}

#[test]
fn test_engine_degenerate_resize_keeps_previous_view() {
    let mut engine = resized_engine();
    let before = engine.snapshot();
    assert!(engine.resize(ViewportSize::new(0.0, 300.0)).is_err());
    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.viewport(), Some(ViewportSize::new(500.0, 400.0)));
}

#[test]
fn test_engine_fit_restores_after_zoom() {
    let mut engine = resized_engine();
    let fitted = engine.snapshot();
    engine.scroll(DevicePoint::new(40.0, 30.0), 1.0).unwrap();
    assert_ne!(engine.snapshot(), fitted);
    engine.fit().unwrap();
    assert_eq!(engine.snapshot(), fitted);
}

#[test]
fn test_engine_from_image() {
    let image = DynamicImage::ImageRgba8(coordinate_image(300, 200));
    let engine = Engine::from_image(&image, &ViewerConfig::default()).unwrap();
    assert_eq!(engine.pyramid().full_size(), ImageSize::new(300, 200));
    assert_eq!(engine.datum().sensitivity(), 5);
}

// ---------------------------------------------------------------------------
// Zoom
// ---------------------------------------------------------------------------

#[test]
fn test_engine_scroll_keeps_cursor_pixel() {
    let mut engine = resized_engine();
    let cursor = DevicePoint::new(123.0, 77.0);
    let before = engine.datum().device_to_full_image(cursor).unwrap();

    let change = engine.scroll(cursor, 3.0).unwrap();
    assert_eq!(engine.datum().ticks(), -4);
    assert_relative_eq!(change.scale(), 2f64.powf(-0.8), epsilon = 1e-12);
    assert_eq!(change.level(), 1);
    assert!(!change.level_changed());
    assert_eq!(engine.datum().device_to_full_image(cursor).unwrap(), before);
}

#[test]
fn test_engine_zoom_centered_doubles() {
    let mut engine = resized_engine();
    let change = engine.zoom_centered(2.0).unwrap();
    assert_eq!(change.scale(), 1.0);
    assert_eq!(change.level(), 0);
    assert_eq!(
        engine
            .datum()
            .device_to_full_image(DevicePoint::new(250.0, 200.0))
            .unwrap(),
        ImagePoint::new(500, 400)
    );
    // 500x400 device pixels at 1:1 from level 0.
    let view = engine.current_image().unwrap();
    assert_eq!(view.image.dimensions(), (500, 400));
    assert_eq!(view.source_rect.min, ImagePoint::new(250, 200));
}

#[test]
fn test_engine_zoom_to_explicit_scale() {
    let mut engine = resized_engine();
    let change = engine.zoom_to(DevicePoint::new(0.0, 0.0), 0.25).unwrap();
    assert_eq!(change.scale(), 0.25);
    assert_eq!(change.level(), 2);
}

#[test]
fn test_engine_failed_zoom_leaves_datum() {
    let mut engine = resized_engine();
    let before = engine.snapshot();
    assert!(matches!(
        engine.zoom_by_factor(DevicePoint::new(1.0, 1.0), -2.0),
        Err(PanZoomError::InvalidScale(_))
    ));
    assert_eq!(engine.snapshot(), before);
}

// ---------------------------------------------------------------------------
// Drag
// ---------------------------------------------------------------------------

#[test]
fn test_engine_drag_pins_grabbed_pixel() {
    let mut engine = resized_engine();
    let start = DevicePoint::new(100.0, 100.0);
    let grabbed = engine.datum().device_to_full_image(start).unwrap();

    engine.begin_drag(start).unwrap();
    assert!(engine.is_dragging());
    for live in [
        DevicePoint::new(110.0, 100.0),
        DevicePoint::new(160.0, 130.0),
        DevicePoint::new(-40.0, 20.0),
    ] {
        let change = engine.drag_to(live).unwrap().unwrap();
        assert_eq!(change.scale(), 0.5);
        assert_eq!(engine.datum().device_to_full_image(live).unwrap(), grabbed);
    }

    engine.end_drag();
    assert!(!engine.is_dragging());
    assert!(engine.drag_to(DevicePoint::new(0.0, 0.0)).unwrap().is_none());
}

#[test]
fn test_engine_drag_before_fit_fails() {
    let mut engine = engine_1000x800();
    assert!(matches!(
        engine.begin_drag(DevicePoint::new(0.0, 0.0)),
        Err(PanZoomError::NotReady)
    ));
    assert!(!engine.is_dragging());
}

// ---------------------------------------------------------------------------
// Sync, loupe, status
// ---------------------------------------------------------------------------

#[test]
fn test_engine_apply_snapshot_from_peer() {
    let mut leader = resized_engine();
    let mut follower = resized_engine();
    leader.scroll(DevicePoint::new(10.0, 10.0), 1.0).unwrap();
    leader.scroll(DevicePoint::new(10.0, 10.0), 1.0).unwrap();

    let change = follower.apply_snapshot(&leader.snapshot()).unwrap();
    assert_eq!(change.snapshot, leader.snapshot());
    assert_eq!(
        follower.current_image().unwrap().image,
        leader.current_image().unwrap().image
    );
}

#[test]
fn test_engine_loupe_centres_on_cursor_pixel() {
    let engine = resized_engine();
    // Device centre maps to full pixel (500, 400).
    let loupe = engine.loupe_at(DevicePoint::new(250.0, 200.0)).unwrap();
    assert_eq!(loupe.dimensions(), (64, 64));
    assert_eq!(
        loupe.get_pixel(32, 32),
        engine.pyramid().full_resolution().get_pixel(500, 400)
    );
}

#[test]
fn test_engine_loupe_larger_than_crop_ceiling_fails() {
    let config = ViewerConfig {
        loupe_size: ImageSize::new(600, 600),
        ..ViewerConfig::default()
    };
    let mut engine = Engine::new(make_pyramid(1000, 800, 100), &config).unwrap();
    engine.resize(ViewportSize::new(500.0, 400.0)).unwrap();
    assert!(engine.loupe_at(DevicePoint::new(250.0, 200.0)).is_ok());

    let config = ViewerConfig {
        max_crop_dimension: 500,
        ..config
    };
    let mut engine = Engine::new(make_pyramid(1000, 800, 100), &config).unwrap();
    engine.resize(ViewportSize::new(500.0, 400.0)).unwrap();
    let err = engine.loupe_at(DevicePoint::new(250.0, 200.0)).unwrap_err();
    assert!(matches!(
        err,
        PanZoomError::DegenerateViewport { width: 600, height: 600 }
    ));
}

#[test]
fn test_engine_visible_extent_and_status() {
    let engine = resized_engine();
    assert_eq!(engine.visible_full_extent().unwrap(), ImageSize::new(1000, 800));

    let status = engine.status(None, 200_000);
    assert_eq!(
        status.to_string(),
        "Level: 1 | Scale: 50% | 0.20 MPix | Full View: 1000 x 800"
    );

    let status = engine.status(Some(DevicePoint::new(100.0, 50.0)), 0);
    assert_eq!(
        status.cursor,
        Some((DevicePoint::new(100.0, 50.0), ImagePoint::new(200, 100)))
    );
}
