use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid input raster: {0}")]
    InvalidInput(String),

    #[error("Invalid LUT: expected a 256x256 table, got {width}x{height} ({samples} samples)")]
    InvalidLut {
        width: usize,
        height: usize,
        samples: usize,
    },

    #[error("Unsupported border value {requested}: only {configured} is supported")]
    UnsupportedBorder { requested: u16, configured: u16 },

    #[error("Invalid squash ratio: {0} (must be a positive integer)")]
    InvalidSquashRatio(usize),

    #[error("Invalid frame count: {0} (expected 1..=256)")]
    InvalidFrameCount(usize),

    #[error("Invalid canvas dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to decode TIFF image: {0}")]
    DecodeError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
