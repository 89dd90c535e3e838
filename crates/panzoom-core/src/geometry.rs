use serde::{Deserialize, Serialize};

/// A point in device (viewport) space. Fractional positions are allowed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DevicePoint {
    pub x: f64,
    pub y: f64,
}

impl DevicePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An integer pixel position in image space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImagePoint {
    pub x: i64,
    pub y: i64,
}

impl ImagePoint {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Size of the on-screen area the image is rendered into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both sides are finite and strictly positive.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> DevicePoint {
        DevicePoint::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Width and height of an image, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn min_side(&self) -> u32 {
        self.width.min(self.height)
    }

    pub fn center(&self) -> ImagePoint {
        ImagePoint::new(i64::from(self.width / 2), i64::from(self.height / 2))
    }
}

/// Half-open pixel rectangle `[min, max)` in image space. May extend past
/// the image bounds or start at negative coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub min: ImagePoint,
    pub max: ImagePoint,
}

impl PixelRect {
    pub fn new(min: ImagePoint, max: ImagePoint) -> Self {
        Self { min, max }
    }

    /// Rectangle of `size` centred on `center`.
    pub fn centered(center: ImagePoint, size: ImageSize) -> Self {
        let half_w = i64::from(size.width / 2);
        let half_h = i64::from(size.height / 2);
        let min = ImagePoint::new(center.x - half_w, center.y - half_h);
        let max = ImagePoint::new(min.x + i64::from(size.width), min.y + i64::from(size.height));
        Self { min, max }
    }

    /// Saturates instead of overflowing for corners far outside the image.
    pub fn width(&self) -> i64 {
        self.max.x.saturating_sub(self.min.x)
    }

    pub fn height(&self) -> i64 {
        self.max.y.saturating_sub(self.min.y)
    }

    /// Overlap with `[0, size)`, or `None` if they do not intersect.
    pub fn clip_to(&self, size: ImageSize) -> Option<PixelRect> {
        let min = ImagePoint::new(self.min.x.max(0), self.min.y.max(0));
        let max = ImagePoint::new(
            self.max.x.min(i64::from(size.width)),
            self.max.y.min(i64::from(size.height)),
        );
        if max.x <= min.x || max.y <= min.y {
            return None;
        }
        Some(PixelRect { min, max })
    }
}
