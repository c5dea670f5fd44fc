use thiserror::Error;

/// Failures reported by a display surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    #[error("Frame is {frame_width}x{frame_height}, display expects {width}x{height}")]
    DimensionMismatch {
        frame_width: usize,
        frame_height: usize,
        width: usize,
        height: usize,
    },

    #[error("Display surface unavailable: {0}")]
    Unavailable(String),
}

/// Failures of the print control surface.
#[derive(Error, Debug)]
pub enum PrintError {
    #[error("A print is already running")]
    AlreadyRunning,

    #[error("Invalid frame set: {0}")]
    InvalidFrameSet(String),

    #[error("Exposure duration must be greater than zero")]
    InvalidExposure,

    #[error("Failed to spawn display worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PrintError>;
