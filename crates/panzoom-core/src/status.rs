use std::fmt;

use crate::geometry::{DevicePoint, ImagePoint, ImageSize};

/// Human-readable view state, e.g. `Level: 2 | Scale: 45% | 3.21 MPix`.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusReport {
    pub level: usize,
    pub scale: f64,
    /// Pixels copied by the last extraction.
    pub pixel_count: u64,
    /// Cursor in device space and the full-resolution pixel under it.
    pub cursor: Option<(DevicePoint, ImagePoint)>,
    /// Full-resolution extent currently visible.
    pub full_view: Option<ImageSize>,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level: {} | Scale: {:.0}% | {:.2} MPix",
            self.level,
            self.scale * 100.0,
            self.pixel_count as f64 / 1_000_000.0
        )?;
        if let Some((device, image)) = self.cursor {
            write!(
                f,
                " | M: {:.1} {:.1} | W: {} {}",
                device.x, device.y, image.x, image.y
            )?;
        }
        if let Some(view) = self.full_view {
            write!(f, " | Full View: {} x {}", view.width, view.height)?;
        }
        Ok(())
    }
}
