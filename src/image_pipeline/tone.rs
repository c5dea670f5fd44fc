//! Tone-mapping module
//!
//! 2D LUT application followed by inversion to a negative.

pub mod lut;
mod mapper;

pub use lut::{LUT_SIZE, Lut};
pub use mapper::{apply_lut, invert};
