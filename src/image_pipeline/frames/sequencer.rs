use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::image_pipeline::common::{PipelineError, Raster, Result};
use crate::image_pipeline::config::MAX_FRAME_COUNT;
use crate::image_pipeline::frames::types::{Frame, FrameSet};

/// Sample of frame `index` for a 16-bit input `v`.
///
/// The high byte is the 8-bit base. The low byte is quantised to
/// `level = (low * frame_count) >> 8`, and the first `level` frames of the
/// cycle show `base + 1`. With 16 frames this is the 12-bit split into an
/// 8-bit base plus a 4-bit remainder.
#[inline]
pub fn frame_sample(v: u16, index: usize, frame_count: usize) -> u8 {
    let base = usize::from(v >> 8);
    let level = (usize::from(v & 0xFF) * frame_count) >> 8;
    let lit = usize::from(level > index);
    (base + lit).min(usize::from(u8::MAX)) as u8
}

/// Splits a 16-bit raster into `frame_count` 8-bit frames whose average
/// reproduces the 16-bit tone to within one 8-bit step.
#[instrument(skip_all, fields(width = raster.width, height = raster.height, frame_count = frame_count))]
pub fn decompose(raster: &Raster, frame_count: usize) -> Result<FrameSet> {
    if frame_count == 0 || frame_count > MAX_FRAME_COUNT {
        return Err(PipelineError::InvalidFrameCount(frame_count));
    }
    raster.validate()?;

    let frames = (0..frame_count)
        .map(|index| Frame {
            width: raster.width,
            height: raster.height,
            data: raster
                .data
                .par_iter()
                .map(|&v| frame_sample(v, index, frame_count))
                .collect(),
        })
        .collect::<Vec<_>>();

    for (i, frame) in frames.iter().enumerate() {
        debug!("Frame {i}: mean={:.2}", frame.mean());
    }

    FrameSet::from_frames(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_and_dimensions() {
        let raster = Raster::filled(8, 3, 0x1280).unwrap();
        let set = decompose(&raster, 16).unwrap();
        assert_eq!(set.len(), 16);
        assert!(set.iter().all(|f| f.dimensions() == (8, 3)));
    }

    #[test]
    fn test_matches_twelve_bit_split_for_sixteen_frames() {
        for v in [0u16, 0x0010, 0x12F0, 0xABCD, 0xFEFF] {
            let v12 = v >> 4;
            let base = (v12 >> 4) as u8;
            let remainder = (v12 & 0xF) as usize;
            for f in 0..16 {
                let expected = base + u8::from(remainder > f);
                assert_eq!(frame_sample(v, f, 16), expected, "v={v:#06x} frame={f}");
            }
        }
    }

    #[test]
    fn test_lit_frames_come_first() {
        // low byte 0x80 -> half the frames lit
        let raster = Raster::filled(1, 1, 0x4080).unwrap();
        let set = decompose(&raster, 4).unwrap();
        let samples: Vec<u8> = set.iter().map(|f| f.data[0]).collect();
        assert_eq!(samples, vec![0x41, 0x41, 0x40, 0x40]);
    }

    #[test]
    fn test_top_of_range_clamped() {
        let raster = Raster::filled(1, 1, u16::MAX).unwrap();
        let set = decompose(&raster, 16).unwrap();
        assert!(set.iter().all(|f| f.data[0] == 255));
    }

    #[test]
    fn test_average_within_bound() {
        let data: Vec<u16> = (0..=u16::MAX).step_by(37).collect();
        let width = data.len();
        let raster = Raster::new(width, 1, data.clone()).unwrap();

        for frame_count in [1, 4, 16, 256] {
            let set = decompose(&raster, frame_count).unwrap();
            let bound = 255.0 / frame_count as f64;
            for (x, &v) in data.iter().enumerate() {
                let error = (set.average_at(x, 0) - f64::from(v) / 256.0).abs();
                assert!(error <= bound, "v={v} frames={frame_count} error={error}");
            }
        }
    }

    #[test]
    fn test_invalid_frame_count() {
        let raster = Raster::filled(2, 2, 0).unwrap();
        assert!(matches!(decompose(&raster, 0), Err(PipelineError::InvalidFrameCount(0))));
        assert!(matches!(decompose(&raster, 257), Err(PipelineError::InvalidFrameCount(257))));
    }

    #[test]
    fn test_frames_brightness_balanced() {
        let data = (0..64 * 64).map(|i| (i * 16) as u16).collect();
        let raster = Raster::new(64, 64, data).unwrap();
        let set = decompose(&raster, 16).unwrap();
        let means: Vec<f64> = set.iter().map(|f| f.mean()).collect();
        let spread = means.iter().cloned().fold(f64::MIN, f64::max) - means.iter().cloned().fold(f64::MAX, f64::min);
        assert!(spread <= 1.0, "frame means spread {spread}");
    }
}
