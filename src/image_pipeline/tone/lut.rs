//! 256×256 two-dimensional tone lookup table

use crate::image_pipeline::common::{PipelineError, Raster, Result};

/// Side length of the LUT in both directions.
pub const LUT_SIZE: usize = 256;

/// Tone curve addressed by the two bytes of a 16-bit sample.
///
/// The table is stored row-major as `lut[fine][coarse]`: the row is the low
/// byte of the input sample, the column is the high byte. This is not a
/// 65536-entry 1D curve read in a different order; a non-trivial table gives
/// different output if it is treated as one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut {
    table: Vec<u16>,
}

impl Lut {
    /// Builds a LUT from a `width × height` table. Anything other than a
    /// complete 256×256 table is rejected.
    pub fn new(width: usize, height: usize, table: Vec<u16>) -> Result<Self> {
        if width != LUT_SIZE || height != LUT_SIZE || table.len() != LUT_SIZE * LUT_SIZE {
            return Err(PipelineError::InvalidLut {
                width,
                height,
                samples: table.len(),
            });
        }
        Ok(Self { table })
    }

    /// Interprets a decoded 16-bit image as a LUT.
    pub fn from_raster(raster: Raster) -> Result<Self> {
        Self::new(raster.width, raster.height, raster.data)
    }

    /// The LUT that maps every sample to itself: `lut[f][c] = f | (c << 8)`.
    pub fn identity() -> Self {
        let table = (0..LUT_SIZE)
            .flat_map(|fine| (0..LUT_SIZE).map(move |coarse| (fine | (coarse << 8)) as u16))
            .collect();
        Self { table }
    }

    /// Entry at row `fine`, column `coarse`.
    pub fn get(&self, fine: usize, coarse: usize) -> u16 {
        self.table[fine * LUT_SIZE + coarse]
    }

    /// Maps one input sample through the table.
    #[inline]
    pub fn lookup(&self, sample: u16) -> u16 {
        let coarse = usize::from(sample >> 8);
        let fine = usize::from(sample & 0xFF);
        self.table[fine * LUT_SIZE + coarse]
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.table
    }
}
