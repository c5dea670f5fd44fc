use std::path::Path;

use tracing::{info, instrument};

use crate::image_pipeline::{
    canvas::{self, CanvasPlan, ReadinessWarning},
    common::{PipelineError, PipelineTimings, Raster, Result},
    config::EnlargerConfig,
    frames::{self, FrameSet},
    orientation,
    tiff::{RasterReader, StandardTiffReader, read_tiff_file},
    tone::{self, Lut},
};

/// Turns a 16-bit source raster into a frame set ready for the display loop.
///
/// Stages run in a fixed order: normalize, LUT, invert, squash (optional),
/// fit, decompose. Preparation is all-or-nothing: any stage error is
/// returned and no frame set is produced.
pub struct PrintPipeline<R: RasterReader = StandardTiffReader> {
    reader: R,
    config: EnlargerConfig,
}

impl PrintPipeline<StandardTiffReader> {
    pub fn new(config: EnlargerConfig) -> Result<Self> {
        Self::with_custom(StandardTiffReader, config)
    }
}

impl<R: RasterReader> PrintPipeline<R> {
    pub fn with_custom(reader: R, config: EnlargerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { reader, config })
    }

    fn validate_squash(squash_ratio: Option<usize>) -> Result<()> {
        match squash_ratio {
            Some(0) => Err(PipelineError::InvalidSquashRatio(0)),
            _ => Ok(()),
        }
    }

    /// Runs every stage up to and including the canvas fit, returning the
    /// 16-bit canvas raster.
    pub fn prepare_canvas(
        &self,
        raster: Raster,
        lut: &Lut,
        squash_ratio: Option<usize>,
    ) -> Result<Raster> {
        let mut timings = PipelineTimings::new();
        self.run_canvas_stages(raster, lut, squash_ratio, &mut timings)
    }

    fn run_canvas_stages(
        &self,
        raster: Raster,
        lut: &Lut,
        squash_ratio: Option<usize>,
        timings: &mut PipelineTimings,
    ) -> Result<Raster> {
        Self::validate_squash(squash_ratio)?;
        raster.validate()?;

        let raster = timings.measure("normalize", || orientation::normalize(raster))?;
        let raster = timings.measure("apply_lut", || tone::apply_lut(raster, lut))?;
        let raster = timings.measure("invert", || tone::invert(raster))?;
        let raster = match squash_ratio {
            Some(ratio) if ratio > 1 => timings.measure("squash", || canvas::squash(raster, ratio))?,
            _ => raster,
        };
        timings.measure("fit", || canvas::fit(raster, &self.config.canvas))
    }

    /// Prepares a frame set from a decoded raster.
    pub fn prepare(&self, raster: Raster, lut: &Lut, squash_ratio: Option<usize>) -> Result<FrameSet> {
        self.prepare_with_timings(raster, lut, squash_ratio)
            .map(|(frames, _)| frames)
    }

    #[instrument(skip_all, fields(width = raster.width, height = raster.height, squash = ?squash_ratio))]
    pub fn prepare_with_timings(
        &self,
        raster: Raster,
        lut: &Lut,
        squash_ratio: Option<usize>,
    ) -> Result<(FrameSet, PipelineTimings)> {
        info!("Starting print preparation");
        let mut timings = PipelineTimings::new();

        let canvas_raster = self.run_canvas_stages(raster, lut, squash_ratio, &mut timings)?;
        let frame_set = timings.measure("decompose", || {
            frames::decompose(&canvas_raster, self.config.frame_count)
        })?;

        info!(
            frames = frame_set.len(),
            total_ms = timings.total_duration().as_secs_f64() * 1000.0,
            "Print preparation complete"
        );
        Ok((frame_set, timings))
    }

    /// Decodes `input_data` with the configured reader, then prepares it.
    pub fn prepare_bytes(
        &self,
        input_data: &[u8],
        lut: &Lut,
        squash_ratio: Option<usize>,
    ) -> Result<FrameSet> {
        let raster = {
            let _span = tracing::info_span!("decode_tiff", input_size = input_data.len()).entered();
            self.reader.read_raster(input_data)?
        };
        self.prepare(raster, lut, squash_ratio)
    }

    /// Loads a source image from disk.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_image<P: AsRef<Path>>(&self, path: P) -> Result<Raster> {
        let raster = read_tiff_file(&self.reader, path.as_ref())?;
        if orientation::is_portrait(&raster) {
            info!("Portrait image detected - will be rotated 90° clockwise to landscape");
        }
        Ok(raster)
    }

    /// Loads a source image from disk and prepares it.
    pub fn prepare_file<P: AsRef<Path>>(
        &self,
        path: P,
        lut: &Lut,
        squash_ratio: Option<usize>,
    ) -> Result<(FrameSet, PipelineTimings)> {
        let raster = self.load_image(path)?;
        self.prepare_with_timings(raster, lut, squash_ratio)
    }

    /// Dimensions `raster` will have once normalized.
    fn oriented_dimensions(raster: &Raster) -> Result<(usize, usize)> {
        raster.validate()?;
        Ok(if orientation::is_portrait(raster) {
            (raster.height, raster.width)
        } else {
            (raster.width, raster.height)
        })
    }

    /// Canvas geometry of `raster` after rotation and squash.
    pub fn plan(&self, raster: &Raster, squash_ratio: Option<usize>) -> Result<CanvasPlan> {
        let (w, h) = Self::oriented_dimensions(raster)?;
        canvas::plan(w, h, squash_ratio, &self.config.canvas)
    }

    /// Warnings about `raster` after rotation, before any processing.
    pub fn check_readiness(&self, raster: &Raster) -> Result<Vec<ReadinessWarning>> {
        let (w, h) = Self::oriented_dimensions(raster)?;
        canvas::check_readiness(w, h, &self.config.canvas)
    }

    pub fn config(&self) -> &EnlargerConfig {
        &self.config
    }
}
