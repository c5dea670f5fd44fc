//! File-backed loading of source images and LUTs.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::image_pipeline::common::{PipelineError, Raster, Result};
use crate::image_pipeline::tiff::reader::RasterReader;
use crate::image_pipeline::tiff::standard_tiff_reader::StandardTiffReader;
use crate::image_pipeline::tone::Lut;

fn has_tiff_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff"))
}

/// Reads a `.tif`/`.tiff` file and decodes it with `reader`.
pub fn read_tiff_file<R: RasterReader>(reader: &R, path: &Path) -> Result<Raster> {
    if !path.exists() {
        return Err(PipelineError::InputReadError(format!(
            "{}: file not found",
            path.display()
        )));
    }

    if !has_tiff_extension(path) {
        return Err(PipelineError::UnsupportedFormat(format!(
            "{}: expected a .tif or .tiff file",
            path.display()
        )));
    }

    let data = std::fs::read(path)
        .map_err(|e| PipelineError::InputReadError(format!("{}: {}", path.display(), e)))?;
    reader.read_raster(&data)
}

/// Loads and validates 256×256 16-bit LUT files.
pub struct LutStore<R: RasterReader = StandardTiffReader> {
    reader: R,
}

impl Default for LutStore<StandardTiffReader> {
    fn default() -> Self {
        Self {
            reader: StandardTiffReader,
        }
    }
}

impl<R: RasterReader> LutStore<R> {
    pub fn with_reader(reader: R) -> Self {
        Self { reader }
    }

    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Lut> {
        let raster = read_tiff_file(&self.reader, path.as_ref())?;
        debug!(width = raster.width, height = raster.height, "LUT decoded");
        let lut = Lut::from_raster(raster)?;
        info!("LUT loaded");
        Ok(lut)
    }
}
