//! Windowed test-mode output.
//!
//! Renders every presented frame scaled down onto a small black 16:9
//! viewport instead of the 8K panel, so a print can be checked on a desktop.

use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::display::error::DisplayError;
use crate::display::session::lock;
use crate::display::surface::DisplaySurface;
use crate::image_pipeline::{CanvasSpec, Frame, Raster, canvas};

/// Width of the test-mode window
pub const PREVIEW_WIDTH: usize = 1280;
/// Height of the test-mode window
pub const PREVIEW_HEIGHT: usize = 720;

/// Read access to the last rendered preview, kept after the surface has been
/// handed to a printer.
#[derive(Clone, Default)]
pub struct PreviewHandle {
    latest: Arc<Mutex<Option<Frame>>>,
}

impl PreviewHandle {
    pub fn latest(&self) -> Option<Frame> {
        lock(&self.latest).clone()
    }

    fn store(&self, frame: Option<Frame>) {
        *lock(&self.latest) = frame;
    }
}

pub struct PreviewSurface {
    canvas: CanvasSpec,
    viewport: CanvasSpec,
    handle: PreviewHandle,
}

impl PreviewSurface {
    /// Preview of `canvas` in a 1280×720 window.
    pub fn new(canvas: &CanvasSpec) -> Self {
        Self {
            canvas: *canvas,
            viewport: CanvasSpec {
                target_width: PREVIEW_WIDTH,
                target_height: PREVIEW_HEIGHT,
                border_value: 0,
            },
            handle: PreviewHandle::default(),
        }
    }

    pub fn with_size(canvas: &CanvasSpec, width: usize, height: usize) -> Result<Self, DisplayError> {
        let viewport = CanvasSpec::new(width, height, 0)
            .map_err(|e| DisplayError::Unavailable(format!("preview window: {e}")))?;
        Ok(Self {
            canvas: *canvas,
            viewport,
            handle: PreviewHandle::default(),
        })
    }

    pub fn handle(&self) -> PreviewHandle {
        self.handle.clone()
    }

    pub fn viewport(&self) -> (usize, usize) {
        self.viewport.dimensions()
    }

    /// Plain 8-bit rendering of a 16-bit print image (`v / 256`), scaled
    /// down and centered on black. No bit-depth emulation.
    pub fn render_raster(&self, raster: &Raster) -> Result<Frame, DisplayError> {
        let eight_bit = Raster {
            width: raster.width,
            height: raster.height,
            data: raster.data.iter().map(|&v| v >> 8).collect(),
        };
        let frame = self.downsample(eight_bit)?;
        self.handle.store(Some(frame.clone()));
        Ok(frame)
    }

    fn downsample(&self, raster: Raster) -> Result<Frame, DisplayError> {
        let fitted = canvas::fit(raster, &self.viewport)
            .map_err(|e| DisplayError::Unavailable(format!("preview render: {e}")))?;
        Ok(Frame {
            width: fitted.width,
            height: fitted.height,
            data: fitted.data.iter().map(|&v| v.min(255) as u8).collect(),
        })
    }
}

impl DisplaySurface for PreviewSurface {
    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        if frame.dimensions() != self.canvas.dimensions() {
            return Err(DisplayError::DimensionMismatch {
                frame_width: frame.width,
                frame_height: frame.height,
                width: self.canvas.target_width,
                height: self.canvas.target_height,
            });
        }

        let raster = Raster {
            width: frame.width,
            height: frame.height,
            data: frame.data.iter().map(|&v| u16::from(v)).collect(),
        };
        let preview = self.downsample(raster)?;
        trace!(mean = preview.mean(), "Preview rendered");
        self.handle.store(Some(preview));
        Ok(())
    }

    fn clear(&mut self) {
        debug!("Preview cleared");
        self.handle.store(None);
    }
}
