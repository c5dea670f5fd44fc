//! Display surface without a screen behind it.
//!
//! Checks every frame against the canvas and logs its brightness, which is
//! enough to dry-run a print and to spot unbalanced frame sets.

use tracing::{debug, trace};

use crate::display::error::DisplayError;
use crate::display::surface::DisplaySurface;
use crate::image_pipeline::{CanvasSpec, Frame};

pub struct HeadlessSurface {
    width: usize,
    height: usize,
    presented: u64,
}

impl HeadlessSurface {
    pub fn new(canvas: &CanvasSpec) -> Self {
        Self {
            width: canvas.target_width,
            height: canvas.target_height,
            presented: 0,
        }
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl DisplaySurface for HeadlessSurface {
    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        if frame.dimensions() != (self.width, self.height) {
            return Err(DisplayError::DimensionMismatch {
                frame_width: frame.width,
                frame_height: frame.height,
                width: self.width,
                height: self.height,
            });
        }

        self.presented += 1;
        trace!(presented = self.presented, mean = frame.mean(), "Frame presented");
        Ok(())
    }

    fn clear(&mut self) {
        debug!(presented = self.presented, "Display cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: usize, height: usize) -> Frame {
        Frame {
            width,
            height,
            data: vec![128; width * height],
        }
    }

    #[test]
    fn test_counts_presented_frames() {
        let canvas = CanvasSpec::new(4, 2, u16::MAX).unwrap();
        let mut surface = HeadlessSurface::new(&canvas);
        surface.present(&frame(4, 2)).unwrap();
        surface.present(&frame(4, 2)).unwrap();
        assert_eq!(surface.presented(), 2);
    }

    #[test]
    fn test_rejects_wrong_dimensions() {
        let canvas = CanvasSpec::new(4, 2, u16::MAX).unwrap();
        let mut surface = HeadlessSurface::new(&canvas);
        assert_eq!(
            surface.present(&frame(2, 4)),
            Err(DisplayError::DimensionMismatch {
                frame_width: 2,
                frame_height: 4,
                width: 4,
                height: 2
            })
        );
        assert_eq!(surface.presented(), 0);
    }
}
