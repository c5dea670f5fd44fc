//! Control surface tying preparation and printing together.

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::display::{DisplaySurface, PrintError, PrintOutcome, PrintProgress, PrintState, Printer};
use crate::image_pipeline::{
    EnlargerConfig, FrameSet, Lut, PipelineTimings, PrintPipeline, Raster, RasterReader,
    StandardTiffReader,
};

/// A configured enlarger: one print pipeline and one display.
pub struct Enlarger<D: DisplaySurface + 'static, R: RasterReader = StandardTiffReader> {
    pipeline: PrintPipeline<R>,
    printer: Printer<D>,
}

impl<D: DisplaySurface + 'static> Enlarger<D, StandardTiffReader> {
    pub fn new(config: EnlargerConfig, surface: D) -> crate::image_pipeline::Result<Self> {
        Self::with_reader(StandardTiffReader, config, surface)
    }
}

impl<D: DisplaySurface + 'static, R: RasterReader> Enlarger<D, R> {
    pub fn with_reader(
        reader: R,
        config: EnlargerConfig,
        surface: D,
    ) -> crate::image_pipeline::Result<Self> {
        let printer = Printer::new(&config, surface);
        let pipeline = PrintPipeline::with_custom(reader, config)?;
        Ok(Self { pipeline, printer })
    }

    /// Prepares a decoded raster, logging readiness warnings first.
    pub fn prepare(
        &self,
        raster: Raster,
        lut: &Lut,
        squash_ratio: Option<usize>,
    ) -> crate::image_pipeline::Result<(FrameSet, PipelineTimings)> {
        for warning in self.pipeline.check_readiness(&raster)? {
            warn!(%warning, "Image readiness");
        }
        self.pipeline.prepare_with_timings(raster, lut, squash_ratio)
    }

    /// Loads a source TIFF and prepares it.
    pub fn prepare_file<P: AsRef<Path>>(
        &self,
        path: P,
        lut: &Lut,
        squash_ratio: Option<usize>,
    ) -> crate::image_pipeline::Result<(FrameSet, PipelineTimings)> {
        let raster = self.pipeline.load_image(path)?;
        let plan = self.pipeline.plan(&raster, squash_ratio)?;
        info!(
            squashed = ?plan.squashed_size,
            scaled = ?plan.scaled_size,
            offset = ?plan.offset,
            scale_factor = plan.scale_factor,
            "Canvas plan"
        );
        self.prepare(raster, lut, squash_ratio)
    }

    pub fn start(&self, frames: FrameSet, exposure: Duration) -> Result<(), PrintError> {
        self.printer.start(frames, exposure)
    }

    pub fn stop(&self) {
        self.printer.stop()
    }

    pub fn is_running(&self) -> bool {
        self.printer.is_running()
    }

    pub fn state(&self) -> PrintState {
        self.printer.state()
    }

    pub fn progress(&self) -> PrintProgress {
        self.printer.progress()
    }

    pub fn wait(&self) -> Option<PrintOutcome> {
        self.printer.wait()
    }

    pub fn pipeline(&self) -> &PrintPipeline<R> {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::HeadlessSurface;
    use crate::image_pipeline::{CanvasSpec, PipelineError, TickPolicy};

    fn config() -> EnlargerConfig {
        EnlargerConfig::builder()
            .canvas(CanvasSpec::new(32, 18, u16::MAX).unwrap())
            .frame_count(4)
            .tick(TickPolicy::RefreshRate(1000))
            .build()
    }

    #[test]
    fn test_prepare_then_print() {
        let config = config();
        let surface = HeadlessSurface::new(&config.canvas);
        let enlarger = Enlarger::new(config, surface).unwrap();

        let raster = Raster::filled(16, 9, 0x1280).unwrap();
        let (frames, timings) = enlarger.prepare(raster, &Lut::identity(), None).unwrap();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames.dimensions(), (32, 18));
        assert!(timings.get_step("decompose").is_some());

        enlarger.start(frames, Duration::from_millis(5)).unwrap();
        assert_eq!(
            enlarger.wait(),
            Some(PrintOutcome::Completed { frames_presented: 5 })
        );
        assert_eq!(enlarger.state(), PrintState::Idle);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EnlargerConfig::builder().frame_count(0).build();
        let surface = HeadlessSurface::new(&config.canvas);
        assert!(matches!(
            Enlarger::new(config, surface),
            Err(PipelineError::InvalidFrameCount(0))
        ));
    }

    #[test]
    fn test_prepare_file_missing() {
        let config = config();
        let surface = HeadlessSurface::new(&config.canvas);
        let enlarger = Enlarger::new(config, surface).unwrap();
        assert!(matches!(
            enlarger.prepare_file("/nonexistent/image.tif", &Lut::identity(), None),
            Err(PipelineError::InputReadError(_))
        ));
    }
}
