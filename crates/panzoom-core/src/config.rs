use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_LOUPE_SIZE, DEFAULT_SENSITIVITY, MAX_CROP_DIMENSION, MIN_PYRAMID_DIMENSION,
    PYRAMID_BLUR_SIGMA,
};
use crate::error::{PanZoomError, Result};
use crate::geometry::ImageSize;

/// Filter used to produce each half-resolution pyramid level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PyramidFilter {
    /// Separable Gaussian blur followed by 2x2 block averaging.
    Gaussian { sigma: f32 },
    Triangle,
    CatmullRom,
    Lanczos3,
}

impl Default for PyramidFilter {
    fn default() -> Self {
        Self::Gaussian {
            sigma: PYRAMID_BLUR_SIGMA,
        }
    }
}

impl fmt::Display for PyramidFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gaussian { sigma } => write!(f, "Gaussian (sigma {sigma})"),
            Self::Triangle => write!(f, "Triangle"),
            Self::CatmullRom => write!(f, "Catmull-Rom"),
            Self::Lanczos3 => write!(f, "Lanczos3"),
        }
    }
}

/// Options for building a pyramid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PyramidOptions {
    /// Levels are added while the smaller side of the last level exceeds this.
    pub min_dimension: u32,
    pub filter: PyramidFilter,
}

impl Default for PyramidOptions {
    fn default() -> Self {
        Self {
            min_dimension: MIN_PYRAMID_DIMENSION,
            filter: PyramidFilter::default(),
        }
    }
}

impl PyramidOptions {
    pub fn with_min_dimension(min_dimension: u32) -> Self {
        Self {
            min_dimension,
            ..Self::default()
        }
    }

    /// `min_dimension` clamped up to [`MIN_PYRAMID_DIMENSION`].
    pub fn effective_min_dimension(&self) -> u32 {
        self.min_dimension.max(MIN_PYRAMID_DIMENSION)
    }
}

/// Everything a viewer needs to know up front.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub min_dimension: u32,
    /// Scroll sensitivity in ticks per octave.
    pub sensitivity: u32,
    /// Sanity ceiling for crop width/height.
    pub max_crop_dimension: u32,
    pub filter: PyramidFilter,
    pub loupe_size: ImageSize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            min_dimension: MIN_PYRAMID_DIMENSION,
            sensitivity: DEFAULT_SENSITIVITY,
            max_crop_dimension: MAX_CROP_DIMENSION,
            filter: PyramidFilter::default(),
            loupe_size: ImageSize::new(DEFAULT_LOUPE_SIZE, DEFAULT_LOUPE_SIZE),
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| PanZoomError::Config(e.to_string()))?;
        Ok(config.validated())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PanZoomError::Config(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Clamp every field into its usable range.
    pub fn validated(&self) -> Self {
        Self {
            min_dimension: self.min_dimension.max(MIN_PYRAMID_DIMENSION),
            sensitivity: self.sensitivity.max(1),
            max_crop_dimension: self.max_crop_dimension.max(1),
            filter: self.filter,
            loupe_size: ImageSize::new(self.loupe_size.width.max(1), self.loupe_size.height.max(1)),
        }
    }

    pub fn pyramid_options(&self) -> PyramidOptions {
        PyramidOptions {
            min_dimension: self.min_dimension,
            filter: self.filter,
        }
    }
}
