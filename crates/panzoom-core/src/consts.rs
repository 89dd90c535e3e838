/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Number of channels in the normalised RGBA8 pixel representation.
pub const RGBA_CHANNEL_COUNT: usize = 4;

/// Smallest accepted value for the pyramid's minimum dimension. Requests
/// below this are clamped up.
pub const MIN_PYRAMID_DIMENSION: u32 = 32;

/// Default scroll sensitivity, in ticks per octave.
pub const DEFAULT_SENSITIVITY: u32 = 5;

/// Gaussian sigma used before each 2x decimation of the pyramid.
pub const PYRAMID_BLUR_SIGMA: f32 = 1.0;

/// Largest crop (in either dimension) the viewport extractor will allocate.
/// Anything bigger indicates a corrupted transform.
pub const MAX_CROP_DIMENSION: u32 = 10_000;

/// Octaves of zoom allowed either side of the identity scale. Tick counts
/// are clamped to this many octaves so the scale stays finite and non-zero.
pub const MAX_ZOOM_OCTAVES: u32 = 64;

/// Added to `-log2(scale)` before flooring when choosing a pyramid level,
/// i.e. round-half-up to the nearest octave.
pub const LEVEL_ROUNDING_BIAS: f64 = 0.5;

/// Default loupe window size, in full-resolution pixels.
pub const DEFAULT_LOUPE_SIZE: u32 = 64;

/// Grey level of the "still loading" placeholder.
pub const PLACEHOLDER_LOADING_GRAY: u8 = 32;

/// Edge length of placeholder images when no viewport size is known yet.
pub const PLACEHOLDER_DEFAULT_SIZE: u32 = 200;
