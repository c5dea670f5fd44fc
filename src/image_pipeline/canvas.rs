//! Canvas adapter module
//!
//! Optional horizontal squash, then scale-down and centering onto the fixed
//! display canvas.

mod fit;
pub mod plan;
mod squash;

pub use fit::{center_offset, fit, fit_with_border, resample_area, scaled_size};
pub use plan::{CanvasPlan, ReadinessWarning, check_readiness, plan};
pub use squash::{squash, squashed_width};
