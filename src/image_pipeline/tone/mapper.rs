use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::image_pipeline::common::{Raster, Result};
use crate::image_pipeline::tone::lut::Lut;

/// Maps every sample through the 2D LUT.
///
/// The raster is validated before any sample is rewritten.
#[instrument(skip_all, fields(width = raster.width, height = raster.height))]
pub fn apply_lut(mut raster: Raster, lut: &Lut) -> Result<Raster> {
    raster.validate()?;

    raster
        .data
        .par_iter_mut()
        .for_each(|sample| *sample = lut.lookup(*sample));

    debug!("LUT applied");
    Ok(raster)
}

/// Turns the raster into its negative: `65535 - v`.
///
/// Runs after the LUT so the tone curve is authored against the positive.
#[instrument(skip_all, fields(width = raster.width, height = raster.height))]
pub fn invert(mut raster: Raster) -> Result<Raster> {
    raster.validate()?;

    raster
        .data
        .par_iter_mut()
        .for_each(|sample| *sample = u16::MAX - *sample);

    Ok(raster)
}
