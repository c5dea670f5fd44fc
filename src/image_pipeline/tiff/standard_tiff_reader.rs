//! 16-bit grayscale TIFF decoding using the tiff crate.

use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::image_pipeline::common::{PipelineError, Raster, Result};
use crate::image_pipeline::tiff::reader::RasterReader;

/// Reads single-channel 16-bit TIFF files into a [`Raster`].
///
/// Anything else (8-bit, RGB, float) is rejected with
/// [`PipelineError::UnsupportedFormat`]; the enlarger only prints 16-bit
/// grayscale.
pub struct StandardTiffReader;

impl RasterReader for StandardTiffReader {
    fn read_raster(&self, data: &[u8]) -> Result<Raster> {
        debug!("Decoding TIFF image, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data))
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;

        let color_type = decoder
            .colortype()
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;
        if color_type != ColorType::Gray(16) {
            return Err(PipelineError::UnsupportedFormat(format!(
                "expected 16-bit grayscale, found {color_type:?}"
            )));
        }

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;

        let samples = match decoder
            .read_image()
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?
        {
            DecodingResult::U16(samples) => samples,
            _ => {
                return Err(PipelineError::UnsupportedFormat(
                    "TIFF samples are not unsigned 16-bit".to_string(),
                ));
            }
        };

        debug!("Decoded image: {}x{}", width, height);
        Raster::new(width as usize, height as usize, samples)
    }
}
