use crate::image_pipeline::common::{Raster, Result};

pub trait RasterReader {
    fn read_raster(&self, data: &[u8]) -> Result<Raster>;
}
