use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanZoomError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Image {width}x{height} is already smaller than the minimum dimension {min_dimension}")]
    ImageTooSmall {
        width: u32,
        height: u32,
        min_dimension: u32,
    },

    #[error("Transform not ready: no anchor has been set")]
    NotReady,

    #[error("Degenerate viewport crop: {width}x{height}")]
    DegenerateViewport { width: i64, height: i64 },

    #[error("Invalid scale: {0}")]
    InvalidScale(f64),

    #[error("Invalid sensitivity: {0} ticks per octave")]
    InvalidSensitivity(u32),

    #[error("Pyramid construction cancelled")]
    Cancelled,

    #[error("Loader thread disconnected before delivering a result")]
    LoaderDisconnected,
}

pub type Result<T> = std::result::Result<T, PanZoomError>;
