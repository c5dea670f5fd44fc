//! Frame types produced by the bit-depth sequencer

use crate::image_pipeline::common::{PipelineError, Result};

/// One 8-bit monochrome frame at canvas resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Width of the frame in pixels
    pub width: usize,
    /// Height of the frame in pixels
    pub height: usize,
    /// 8-bit samples, row-major
    pub data: Vec<u8>,
}

impl Frame {
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Mean brightness, used to check frames are balanced against each other.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.data.iter().map(|&v| u64::from(v)).sum();
        sum as f64 / self.data.len() as f64
    }
}

/// Ordered frames of one emulation cycle. Order is significant: the display
/// loop presents them strictly in sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSet {
    frames: Vec<Frame>,
}

impl FrameSet {
    /// Wraps frames after checking they are non-empty and share dimensions.
    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        let Some(first) = frames.first() else {
            return Err(PipelineError::InvalidInput("frame set is empty".to_string()));
        };

        let dims = first.dimensions();
        for (i, frame) in frames.iter().enumerate() {
            if frame.dimensions() != dims || frame.data.len() != dims.0 * dims.1 {
                return Err(PipelineError::InvalidInput(format!(
                    "frame {i} is {}x{} ({} samples), expected {}x{}",
                    frame.width,
                    frame.height,
                    frame.data.len(),
                    dims.0,
                    dims.1
                )));
            }
        }

        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Shared dimensions of every frame.
    pub fn dimensions(&self) -> (usize, usize) {
        self.frames[0].dimensions()
    }

    /// Time-averaged intensity the set produces at pixel `(x, y)`.
    pub fn average_at(&self, x: usize, y: usize) -> f64 {
        let (width, _) = self.dimensions();
        let sum: u32 = self
            .frames
            .iter()
            .map(|f| u32::from(f.data[y * width + x]))
            .sum();
        f64::from(sum) / self.frames.len() as f64
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl<'a> IntoIterator for &'a FrameSet {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: usize, height: usize, value: u8) -> Frame {
        Frame {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    #[test]
    fn test_from_frames_rejects_empty() {
        assert!(matches!(
            FrameSet::from_frames(vec![]),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_frames_rejects_mixed_dimensions() {
        let result = FrameSet::from_frames(vec![frame(4, 2, 0), frame(2, 4, 0)]);
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }

    #[test]
    fn test_average_at() {
        let set = FrameSet::from_frames(vec![frame(2, 2, 10), frame(2, 2, 11), frame(2, 2, 11), frame(2, 2, 10)]).unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.dimensions(), (2, 2));
        assert!((set.average_at(1, 1) - 10.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_frame_mean() {
        let f = Frame {
            width: 2,
            height: 1,
            data: vec![0, 255],
        };
        assert!((f.mean() - 127.5).abs() < f64::EPSILON);
    }
}
