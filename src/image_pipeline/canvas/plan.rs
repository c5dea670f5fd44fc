//! Dry-run geometry and readiness checks for the canvas adapter.
//!
//! Both work from dimensions alone, so the shell can report what a print will
//! look like before any pixel is touched.

use std::fmt;

use crate::image_pipeline::canvas::fit::{center_offset, scaled_size};
use crate::image_pipeline::canvas::squash::squashed_width;
use crate::image_pipeline::common::{PipelineError, Result};
use crate::image_pipeline::config::CanvasSpec;

/// Pixel count above which preparation is noticeably slow
const LARGE_IMAGE_PIXELS: usize = 10_000_000;

/// Geometry of a raster as it goes through squash and fit.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasPlan {
    pub original_size: (usize, usize),
    pub squash_ratio: usize,
    pub squashed_size: (usize, usize),
    pub scaled_size: (usize, usize),
    pub canvas_size: (usize, usize),
    /// Top-left corner of the image on the canvas
    pub offset: (usize, usize),
    /// Border on the right and bottom edges
    pub trailing_padding: (usize, usize),
    pub scale_factor: f64,
    /// Bytes of one 16-bit canvas raster
    pub canvas_bytes: usize,
}

impl CanvasPlan {
    pub fn compression_applied(&self) -> bool {
        self.squash_ratio > 1
    }

    pub fn scaling_applied(&self) -> bool {
        self.scaled_size != self.squashed_size
    }
}

/// Computes the canvas geometry for a `width × height` raster.
pub fn plan(
    width: usize,
    height: usize,
    squash_ratio: Option<usize>,
    canvas: &CanvasSpec,
) -> Result<CanvasPlan> {
    if width == 0 || height == 0 {
        return Err(PipelineError::InvalidInput(format!(
            "cannot plan a {width}x{height} raster"
        )));
    }
    canvas.validate()?;

    let ratio = squash_ratio.unwrap_or(1);
    if ratio == 0 {
        return Err(PipelineError::InvalidSquashRatio(ratio));
    }

    let squashed = (squashed_width(width, ratio), height);
    let scaled = scaled_size(squashed.0, squashed.1, canvas);
    let offset = center_offset(scaled.0, scaled.1, canvas);
    let (tw, th) = canvas.dimensions();

    Ok(CanvasPlan {
        original_size: (width, height),
        squash_ratio: ratio,
        squashed_size: squashed,
        scaled_size: scaled,
        canvas_size: (tw, th),
        offset,
        trailing_padding: (tw - scaled.0 - offset.0, th - scaled.1 - offset.1),
        scale_factor: scaled.0 as f64 / squashed.0 as f64,
        canvas_bytes: canvas.pixel_count() * std::mem::size_of::<u16>(),
    })
}

/// Non-fatal observations about a raster about to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessWarning {
    /// Covers less than a quarter of the canvas in both directions
    SmallImage { width: usize, height: usize },
    /// Taller than the canvas; it will be scaled down
    ExceedsCanvasHeight { height: usize, canvas_height: usize },
    /// Wider than the canvas; squashing keeps more resolution than scaling
    ExceedsCanvasWidth { width: usize, canvas_width: usize },
    /// Preparation will take noticeably longer
    LargeImage { pixels: usize },
}

impl fmt::Display for ReadinessWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadinessWarning::SmallImage { width, height } => {
                write!(f, "Image {width}x{height} is small compared to the canvas")
            }
            ReadinessWarning::ExceedsCanvasHeight {
                height,
                canvas_height,
            } => write!(
                f,
                "Image height ({height}) exceeds display height ({canvas_height}) - it will be scaled down"
            ),
            ReadinessWarning::ExceedsCanvasWidth {
                width,
                canvas_width,
            } => write!(
                f,
                "Image width ({width}) exceeds display width ({canvas_width}) - consider squashing"
            ),
            ReadinessWarning::LargeImage { pixels } => write!(
                f,
                "Large image ({:.1} MP) - processing may take longer",
                *pixels as f64 / 1_000_000.0
            ),
        }
    }
}

/// Inspects a `width × height` raster against the canvas. Fails only for
/// an empty raster.
pub fn check_readiness(
    width: usize,
    height: usize,
    canvas: &CanvasSpec,
) -> Result<Vec<ReadinessWarning>> {
    if width == 0 || height == 0 {
        return Err(PipelineError::InvalidInput(format!(
            "cannot check a {width}x{height} raster"
        )));
    }
    let (tw, th) = canvas.dimensions();
    let mut warnings = Vec::new();

    if width * 4 < tw && height * 4 < th {
        warnings.push(ReadinessWarning::SmallImage { width, height });
    }
    if height > th {
        warnings.push(ReadinessWarning::ExceedsCanvasHeight {
            height,
            canvas_height: th,
        });
    }
    if width > tw {
        warnings.push(ReadinessWarning::ExceedsCanvasWidth {
            width,
            canvas_width: tw,
        });
    }
    if width * height > LARGE_IMAGE_PIXELS {
        warnings.push(ReadinessWarning::LargeImage {
            pixels: width * height,
        });
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_with_squash() {
        let plan = plan(2000, 1000, Some(3), &CanvasSpec::default()).unwrap();

        assert_eq!(plan.original_size, (2000, 1000));
        assert_eq!(plan.squashed_size, (666, 1000));
        assert_eq!(plan.scaled_size, (666, 1000));
        assert_eq!(plan.canvas_size, (7680, 4320));
        assert_eq!(plan.offset, ((7680 - 666) / 2, (4320 - 1000) / 2));
        assert!(plan.compression_applied());
        assert!(!plan.scaling_applied());
        assert_eq!(plan.canvas_bytes, 7680 * 4320 * 2);
    }

    #[test]
    fn test_plan_scaling() {
        let plan = plan(9000, 6000, None, &CanvasSpec::default()).unwrap();
        assert_eq!(plan.scaled_size, (6480, 4320));
        assert_eq!(plan.offset, (600, 0));
        assert_eq!(plan.trailing_padding, (600, 0));
        assert!(plan.scaling_applied());
        assert!((plan.scale_factor - 0.72).abs() < 1e-9);
    }

    #[test]
    fn test_plan_rejects_zero_ratio_and_empty_raster() {
        let canvas = CanvasSpec::default();
        assert!(matches!(plan(10, 10, Some(0), &canvas), Err(PipelineError::InvalidSquashRatio(0))));
        assert!(matches!(plan(0, 10, None, &canvas), Err(PipelineError::InvalidInput(_))));
    }

    #[test]
    fn test_readiness_small_image() {
        let warnings = check_readiness(200, 100, &CanvasSpec::default()).unwrap();
        assert_eq!(warnings, vec![ReadinessWarning::SmallImage { width: 200, height: 100 }]);
        assert!(warnings[0].to_string().contains("small"));
    }

    #[test]
    fn test_readiness_oversized_image() {
        let canvas = CanvasSpec::new(40, 20, u16::MAX).unwrap();
        let warnings = check_readiness(50, 30, &canvas).unwrap();
        assert!(warnings.contains(&ReadinessWarning::ExceedsCanvasHeight {
            height: 30,
            canvas_height: 20
        }));
        assert!(warnings.contains(&ReadinessWarning::ExceedsCanvasWidth {
            width: 50,
            canvas_width: 40
        }));
    }

    #[test]
    fn test_readiness_fitting_image_has_no_warnings() {
        let canvas = CanvasSpec::new(40, 20, u16::MAX).unwrap();
        assert!(check_readiness(30, 15, &canvas).unwrap().is_empty());
        assert!(check_readiness(0, 15, &canvas).is_err());
    }
}
