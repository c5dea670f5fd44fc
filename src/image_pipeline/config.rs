//! Deployment configuration for the print pipeline and display loop

use std::time::Duration;

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Native width of the secondary (8K) display
pub const DISPLAY_WIDTH: usize = 7680;
/// Native height of the secondary (8K) display
pub const DISPLAY_HEIGHT: usize = 4320;
/// 16-bit white, the only border the deployed hardware prints with
pub const WHITE_BORDER: u16 = u16::MAX;
/// Frames per emulation cycle (8-bit base + 4 bits of temporal dither)
pub const DEFAULT_FRAME_COUNT: usize = 16;
/// Frame refresh rate of the printing window
pub const DEFAULT_REFRESH_RATE: u32 = 16;
/// One frame per possible value of the 8-bit fraction
pub const MAX_FRAME_COUNT: usize = 256;

/// Fixed-resolution target surface the raster is fitted onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSpec {
    pub target_width: usize,
    pub target_height: usize,
    pub border_value: u16,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            target_width: DISPLAY_WIDTH,
            target_height: DISPLAY_HEIGHT,
            border_value: WHITE_BORDER,
        }
    }
}

impl CanvasSpec {
    pub fn new(target_width: usize, target_height: usize, border_value: u16) -> Result<Self> {
        let canvas = Self {
            target_width,
            target_height,
            border_value,
        };
        canvas.validate()?;
        Ok(canvas)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(PipelineError::InvalidDimensions(
                self.target_width,
                self.target_height,
            ));
        }
        Ok(())
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.target_width, self.target_height)
    }

    pub fn pixel_count(&self) -> usize {
        self.target_width * self.target_height
    }
}

/// How the display loop paces frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPolicy {
    /// Fixed refresh tick in frames per second; frames cycle until the
    /// exposure elapses.
    RefreshRate(u32),
    /// Each frame of the set is shown once for `exposure / frame_count`.
    SplitExposure,
}

impl Default for TickPolicy {
    fn default() -> Self {
        TickPolicy::RefreshRate(DEFAULT_REFRESH_RATE)
    }
}

/// Pacing of one print session, derived from the tick policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    /// Time each frame stays on the display
    pub interval: Duration,
    /// Total number of frames presented over the exposure
    pub ticks: u64,
}

impl TickPolicy {
    pub fn schedule(&self, exposure: Duration, frame_count: usize) -> TickSchedule {
        match *self {
            TickPolicy::RefreshRate(fps) => {
                let fps = fps.max(1);
                let ticks = exposure.as_nanos() * u128::from(fps) / 1_000_000_000;
                TickSchedule {
                    interval: Duration::from_secs(1) / fps,
                    ticks: u64::try_from(ticks).unwrap_or(u64::MAX).max(1),
                }
            }
            TickPolicy::SplitExposure => {
                let frames = u32::try_from(frame_count.max(1)).unwrap_or(u32::MAX);
                TickSchedule {
                    interval: exposure / frames,
                    ticks: u64::from(frames),
                }
            }
        }
    }
}

/// Configuration for the whole enlarger: canvas, emulated depth and pacing.
///
/// Supplied once at start-up and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnlargerConfig {
    /// Target canvas of the secondary display
    pub canvas: CanvasSpec,
    /// Number of 8-bit frames per emulation cycle
    pub frame_count: usize,
    /// Pacing of the display loop
    pub tick: TickPolicy,
}

impl Default for EnlargerConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSpec::default(),
            frame_count: DEFAULT_FRAME_COUNT,
            tick: TickPolicy::default(),
        }
    }
}

impl EnlargerConfig {
    pub fn builder() -> EnlargerConfigBuilder {
        EnlargerConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        self.canvas.validate()?;

        if self.frame_count == 0 || self.frame_count > MAX_FRAME_COUNT {
            return Err(PipelineError::InvalidFrameCount(self.frame_count));
        }

        if self.tick == TickPolicy::RefreshRate(0) {
            return Err(PipelineError::InvalidConfig(
                "refresh rate must be at least 1 fps".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for EnlargerConfig
#[derive(Default)]
pub struct EnlargerConfigBuilder {
    canvas: Option<CanvasSpec>,
    frame_count: Option<usize>,
    tick: Option<TickPolicy>,
}

impl EnlargerConfigBuilder {
    pub fn canvas(mut self, canvas: CanvasSpec) -> Self {
        self.canvas = Some(canvas);
        self
    }

    pub fn frame_count(mut self, frame_count: usize) -> Self {
        self.frame_count = Some(frame_count);
        self
    }

    pub fn tick(mut self, tick: TickPolicy) -> Self {
        self.tick = Some(tick);
        self
    }

    pub fn build(self) -> EnlargerConfig {
        let default = EnlargerConfig::default();
        EnlargerConfig {
            canvas: self.canvas.unwrap_or(default.canvas),
            frame_count: self.frame_count.unwrap_or(default.frame_count),
            tick: self.tick.unwrap_or(default.tick),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployed_display() {
        let config = EnlargerConfig::default();
        assert_eq!(config.canvas.dimensions(), (7680, 4320));
        assert_eq!(config.canvas.border_value, 65535);
        assert_eq!(config.frame_count, 16);
        assert_eq!(config.tick, TickPolicy::RefreshRate(16));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = EnlargerConfig::builder()
            .canvas(CanvasSpec::new(64, 32, WHITE_BORDER).unwrap())
            .frame_count(4)
            .tick(TickPolicy::SplitExposure)
            .build();

        assert_eq!(config.canvas.dimensions(), (64, 32));
        assert_eq!(config.frame_count, 4);
        assert_eq!(config.tick, TickPolicy::SplitExposure);
    }

    #[test]
    fn test_frame_count_out_of_range() {
        for frame_count in [0, 257] {
            let config = EnlargerConfig::builder().frame_count(frame_count).build();
            assert!(matches!(
                config.validate(),
                Err(PipelineError::InvalidFrameCount(n)) if n == frame_count
            ));
        }
    }

    #[test]
    fn test_zero_canvas_rejected() {
        assert!(matches!(
            CanvasSpec::new(0, 10, WHITE_BORDER),
            Err(PipelineError::InvalidDimensions(0, 10))
        ));
    }

    #[test]
    fn test_zero_refresh_rate_rejected() {
        let config = EnlargerConfig::builder()
            .tick(TickPolicy::RefreshRate(0))
            .build();
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_refresh_rate_schedule() {
        let schedule = TickPolicy::RefreshRate(16).schedule(Duration::from_secs(10), 16);
        assert_eq!(schedule.interval, Duration::from_micros(62_500));
        assert_eq!(schedule.ticks, 160);
    }

    #[test]
    fn test_refresh_rate_schedule_shows_at_least_one_frame() {
        let schedule = TickPolicy::RefreshRate(16).schedule(Duration::from_millis(10), 16);
        assert_eq!(schedule.ticks, 1);
    }

    #[test]
    fn test_split_exposure_schedule() {
        let schedule = TickPolicy::SplitExposure.schedule(Duration::from_secs(4), 16);
        assert_eq!(schedule.interval, Duration::from_millis(250));
        assert_eq!(schedule.ticks, 16);
    }
}
