//! Raster data types shared by every pipeline stage

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Single-channel 16-bit raster, stored row-major.
///
/// A raster is moved from stage to stage; stages take ownership and hand a
/// new (or rewritten) raster to the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width of the raster in pixels
    pub width: usize,
    /// Height of the raster in pixels
    pub height: usize,
    /// Sample data, `height` rows of `width` samples
    pub data: Vec<u16>,
}

impl Raster {
    /// Builds a raster and checks that the buffer matches its dimensions.
    pub fn new(width: usize, height: usize, data: Vec<u16>) -> Result<Self> {
        let raster = Self {
            width,
            height,
            data,
        };
        raster.validate()?;
        Ok(raster)
    }

    /// Builds a raster with every sample set to `value`.
    pub fn filled(width: usize, height: usize, value: u16) -> Result<Self> {
        let len = width
            .checked_mul(height)
            .ok_or_else(|| PipelineError::InvalidInput(format!("{width}x{height} overflows")))?;
        Self::new(width, height, vec![value; len])
    }

    /// Checks the raster invariants: both dimensions non-zero and a buffer of
    /// exactly `width * height` samples.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::InvalidInput(format!(
                "raster must be two-dimensional, got {}x{}",
                self.width, self.height
            )));
        }

        match self.width.checked_mul(self.height) {
            Some(len) if len == self.data.len() => Ok(()),
            _ => Err(PipelineError::InvalidInput(format!(
                "buffer holds {} samples, {}x{} requires {}",
                self.data.len(),
                self.width,
                self.height,
                self.width.saturating_mul(self.height)
            ))),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Sample at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> u16 {
        self.data[y * self.width + x]
    }

    pub fn row(&self, y: usize) -> &[u16] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}
