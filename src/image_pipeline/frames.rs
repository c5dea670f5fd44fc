//! Bit-depth frame sequencing module
//!
//! Temporal dithering of a 16-bit canvas into a set of 8-bit frames.

mod sequencer;
pub mod types;

pub use sequencer::{decompose, frame_sample};
pub use types::{Frame, FrameSet};
