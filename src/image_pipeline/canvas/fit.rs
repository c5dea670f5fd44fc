use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::image_pipeline::common::{PipelineError, Raster, Result};
use crate::image_pipeline::config::CanvasSpec;

/// Size of the raster once it fits the canvas. Rasters that already fit keep
/// their size; larger ones are scaled down uniformly so the limiting axis
/// equals the canvas exactly. Never scales up.
pub fn scaled_size(width: usize, height: usize, canvas: &CanvasSpec) -> (usize, usize) {
    let (tw, th) = canvas.dimensions();
    if width <= tw && height <= th {
        return (width, height);
    }

    // width / tw >= height / th, compared without division
    if width as u128 * th as u128 >= height as u128 * tw as u128 {
        let h = (height as u128 * tw as u128 / width as u128) as usize;
        (tw, h.max(1))
    } else {
        let w = (width as u128 * th as u128 / height as u128) as usize;
        (w.max(1), th)
    }
}

/// Top-left placement of a `width × height` raster centered on the canvas.
/// Odd padding goes to the right and bottom.
pub fn center_offset(width: usize, height: usize, canvas: &CanvasSpec) -> (usize, usize) {
    (
        canvas.target_width.saturating_sub(width) / 2,
        canvas.target_height.saturating_sub(height) / 2,
    )
}

/// Box-filter downscale. Each output pixel is the rounded mean of the source
/// block it covers; block edges are integer positions so the result is
/// reproducible bit for bit.
pub fn resample_area(raster: &Raster, out_w: usize, out_h: usize) -> Result<Raster> {
    if out_w == 0 || out_h == 0 {
        return Err(PipelineError::InvalidDimensions(out_w, out_h));
    }
    raster.validate()?;

    let (src_w, src_h) = raster.dimensions();
    let x_edges: Vec<usize> = (0..=out_w).map(|i| i * src_w / out_w).collect();
    let y_edges: Vec<usize> = (0..=out_h).map(|i| i * src_h / out_h).collect();

    let mut data = vec![0u16; out_w * out_h];
    data.par_chunks_mut(out_w)
        .enumerate()
        .for_each(|(oy, out_row)| {
            let (y0, y1) = (y_edges[oy], y_edges[oy + 1].max(y_edges[oy] + 1));
            let mut column_sums = vec![0u64; src_w];
            for y in y0..y1 {
                for (sum, &v) in column_sums.iter_mut().zip(raster.row(y)) {
                    *sum += u64::from(v);
                }
            }

            for (ox, sample) in out_row.iter_mut().enumerate() {
                let (x0, x1) = (x_edges[ox], x_edges[ox + 1].max(x_edges[ox] + 1));
                let sum: u64 = column_sums[x0..x1].iter().sum();
                let n = ((x1 - x0) * (y1 - y0)) as u64;
                *sample = ((sum + n / 2) / n) as u16;
            }
        });

    Ok(Raster {
        width: out_w,
        height: out_h,
        data,
    })
}

/// Fits the raster onto the canvas using the configured border.
pub fn fit(raster: Raster, canvas: &CanvasSpec) -> Result<Raster> {
    fit_with_border(raster, canvas, canvas.border_value)
}

/// Scales the raster down if needed and centers it on a canvas-sized raster
/// filled with `border`.
///
/// Only the canvas's configured border is accepted.
#[instrument(skip_all, fields(width = raster.width, height = raster.height))]
pub fn fit_with_border(raster: Raster, canvas: &CanvasSpec, border: u16) -> Result<Raster> {
    if border != canvas.border_value {
        return Err(PipelineError::UnsupportedBorder {
            requested: border,
            configured: canvas.border_value,
        });
    }
    canvas.validate()?;
    raster.validate()?;

    let (sw, sh) = scaled_size(raster.width, raster.height, canvas);
    let scaled = if (sw, sh) == raster.dimensions() {
        raster
    } else {
        debug!(scaled_width = sw, scaled_height = sh, "Scaling raster down to canvas");
        resample_area(&raster, sw, sh)?
    };

    let (tw, th) = canvas.dimensions();
    let (x_off, y_off) = center_offset(sw, sh, canvas);
    let mut data = vec![border; tw * th];

    data.par_chunks_mut(tw)
        .skip(y_off)
        .take(sh)
        .zip(scaled.data.par_chunks(sw))
        .for_each(|(canvas_row, src_row)| {
            canvas_row[x_off..x_off + sw].copy_from_slice(src_row);
        });

    debug!(x_offset = x_off, y_offset = y_off, "Raster centered on canvas");
    Ok(Raster {
        width: tw,
        height: th,
        data,
    })
}
