//! Common utilities module
//!
//! This module contains the raster type, errors and step timing shared
//! across the image pipeline.

pub mod error;
pub mod timing;
pub mod types;

pub use error::{PipelineError, Result};
pub use timing::{PipelineTimings, StepTiming, Timer};
pub use types::Raster;
