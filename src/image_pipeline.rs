//! Print image pipeline module
//!
//! Orientation, tone mapping, canvas adaptation and bit-depth frame
//! sequencing, composed by [`PrintPipeline`]. Stages are pure functions over
//! owned rasters; only the TIFF adapters touch the file system.

pub mod canvas;
pub mod common;
pub mod config;
pub mod conversions;
pub mod frames;
pub mod orientation;
pub mod tiff;
pub mod tone;

pub use common::{
    PipelineError,
    PipelineTimings,
    Raster,
    Result,
};

pub use config::{
    CanvasSpec,
    EnlargerConfig,
    EnlargerConfigBuilder,
    TickPolicy,
    TickSchedule,
};

pub use canvas::{
    CanvasPlan,
    ReadinessWarning,
};

pub use frames::{
    Frame,
    FrameSet,
};

pub use tiff::{
    LutStore,
    RasterReader,
    StandardTiffReader,
};

pub use tone::Lut;

pub use conversions::PrintPipeline;
