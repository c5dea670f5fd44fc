use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::image_pipeline::common::{PipelineError, Raster, Result};

/// Width after squashing `width` columns by `ratio`.
///
/// Columns that do not complete a group are dropped. A raster narrower than
/// `ratio` collapses to a single column.
pub fn squashed_width(width: usize, ratio: usize) -> usize {
    if ratio == 0 {
        return width;
    }
    (width / ratio).max(1)
}

/// Compresses the raster horizontally by averaging groups of `ratio`
/// adjacent columns into one (rounded mean). Height is preserved and
/// `ratio == 1` returns the raster untouched.
#[instrument(skip_all, fields(width = raster.width, height = raster.height, ratio = ratio))]
pub fn squash(raster: Raster, ratio: usize) -> Result<Raster> {
    raster.validate()?;

    if ratio == 0 {
        return Err(PipelineError::InvalidSquashRatio(ratio));
    }
    if ratio == 1 {
        return Ok(raster);
    }

    let out_w = squashed_width(raster.width, ratio);
    let group = ratio.min(raster.width);
    if raster.width < ratio {
        debug!("Raster narrower than squash ratio, collapsing to one column");
    }

    let mut data = vec![0u16; out_w * raster.height];
    data.par_chunks_mut(out_w)
        .zip(raster.data.par_chunks(raster.width))
        .for_each(|(out_row, src_row)| {
            for (sample, cols) in out_row.iter_mut().zip(src_row.chunks_exact(group)) {
                let sum: u64 = cols.iter().map(|&v| u64::from(v)).sum();
                let n = group as u64;
                *sample = ((sum + n / 2) / n) as u16;
            }
        });

    debug!(out_width = out_w, "Squash complete");
    Ok(Raster {
        width: out_w,
        height: raster.height,
        data,
    })
}
