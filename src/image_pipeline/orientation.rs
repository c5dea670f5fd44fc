//! Orientation normalization
//!
//! The enlarger always prints landscape. Portrait rasters (taller than wide)
//! are turned 90° clockwise; square and landscape rasters pass through
//! untouched.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::image_pipeline::common::{Raster, Result};

/// Returns `true` when the raster is taller than it is wide.
///
/// Detection never fails: an invalid raster is simply not portrait.
pub fn is_portrait(raster: &Raster) -> bool {
    raster.is_valid() && raster.height > raster.width
}

/// Rotates the raster 90° clockwise. Output dimensions are swapped.
pub fn rotate_clockwise_90(raster: &Raster) -> Result<Raster> {
    raster.validate()?;

    let (src_w, src_h) = raster.dimensions();
    let (out_w, out_h) = (src_h, src_w);
    let mut data = vec![0u16; out_w * out_h];

    // out[r][c] = in[src_h - 1 - c][r]
    data.par_chunks_mut(out_w)
        .enumerate()
        .for_each(|(r, row)| {
            for (c, sample) in row.iter_mut().enumerate() {
                *sample = raster.data[(src_h - 1 - c) * src_w + r];
            }
        });

    Ok(Raster {
        width: out_w,
        height: out_h,
        data,
    })
}

/// Rotates portrait rasters to landscape, returns others unchanged.
#[instrument(skip_all, fields(width = raster.width, height = raster.height))]
pub fn normalize(raster: Raster) -> Result<Raster> {
    raster.validate()?;

    if is_portrait(&raster) {
        debug!("Portrait raster detected, rotating 90° clockwise");
        rotate_clockwise_90(&raster)
    } else {
        Ok(raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::common::PipelineError;

    /// 2 wide, 3 tall:
    /// ```text
    /// 1 2
    /// 3 4
    /// 5 6
    /// ```
    fn portrait() -> Raster {
        Raster::new(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap()
    }

    #[test]
    fn test_is_portrait() {
        assert!(is_portrait(&portrait()));
        assert!(!is_portrait(&Raster::filled(3, 3, 0).unwrap()));
        assert!(!is_portrait(&Raster::filled(4, 3, 0).unwrap()));
    }

    #[test]
    fn test_is_portrait_false_for_invalid_raster() {
        let invalid = Raster {
            width: 0,
            height: 5,
            data: vec![],
        };
        assert!(!is_portrait(&invalid));
    }

    #[test]
    fn test_rotate_clockwise_corner_values() {
        let rotated = rotate_clockwise_90(&portrait()).unwrap();
        assert_eq!(rotated.dimensions(), (3, 2));
        assert_eq!(rotated.data, vec![5, 3, 1, 6, 4, 2]);
    }

    #[test]
    fn test_rotate_rejects_invalid_raster() {
        let invalid = Raster {
            width: 2,
            height: 2,
            data: vec![1, 2, 3],
        };
        assert!(matches!(
            rotate_clockwise_90(&invalid),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_four_rotations_are_identity() {
        let original = portrait();
        let mut raster = original.clone();
        for _ in 0..4 {
            raster = rotate_clockwise_90(&raster).unwrap();
        }
        assert_eq!(raster, original);
    }

    #[test]
    fn test_normalize_swaps_portrait_dimensions() {
        let raster = Raster::filled(20, 50, 123).unwrap();
        let normalized = normalize(raster).unwrap();
        assert_eq!(normalized.dimensions(), (50, 20));
        assert!(normalized.data.iter().all(|&v| v == 123));
    }

    #[test]
    fn test_normalize_is_identity_for_landscape_and_square() {
        for (w, h) in [(5, 3), (4, 4), (1, 1)] {
            let data: Vec<u16> = (0..(w * h) as u16).collect();
            let raster = Raster::new(w, h, data).unwrap();
            assert_eq!(normalize(raster.clone()).unwrap(), raster);
        }
    }

    #[test]
    fn test_normalize_rejects_invalid_raster() {
        let invalid = Raster {
            width: 3,
            height: 0,
            data: vec![],
        };
        assert!(matches!(normalize(invalid), Err(PipelineError::InvalidInput(_))));
    }
}
