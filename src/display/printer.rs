use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::display::error::{PrintError, Result};
use crate::display::session::{
    CancelToken, Control, PrintOutcome, PrintProgress, PrintState, Session, SessionProgress, lock,
};
use crate::display::surface::DisplaySurface;
use crate::image_pipeline::{CanvasSpec, EnlargerConfig, FrameSet, TickPolicy};

#[derive(Default)]
struct Worker {
    cancel: Option<CancelToken>,
    handle: Option<JoinHandle<PrintOutcome>>,
    /// Cancelled workers superseded by a newer session, still winding down.
    retired: Vec<JoinHandle<PrintOutcome>>,
    last_outcome: Option<PrintOutcome>,
}

/// Print control surface.
///
/// Owns the display surface and at most one running session. Every method
/// takes `&self`, so a printer can be shared with the thread that stops it.
pub struct Printer<D: DisplaySurface + 'static> {
    canvas: CanvasSpec,
    tick: TickPolicy,
    surface: Arc<Mutex<D>>,
    control: Arc<Mutex<Control>>,
    progress: Arc<SessionProgress>,
    worker: Mutex<Worker>,
}

impl<D: DisplaySurface + 'static> Printer<D> {
    pub fn new(config: &EnlargerConfig, surface: D) -> Self {
        Self {
            canvas: config.canvas,
            tick: config.tick,
            surface: Arc::new(Mutex::new(surface)),
            control: Arc::new(Mutex::new(Control {
                state: PrintState::Idle,
                generation: 0,
            })),
            progress: Arc::new(SessionProgress::default()),
            worker: Mutex::new(Worker::default()),
        }
    }

    /// Starts presenting `frames` cyclically for `exposure` on a background
    /// worker. Returns as soon as the worker is running.
    #[instrument(skip(self, frames), fields(frames = frames.len()))]
    pub fn start(&self, frames: FrameSet, exposure: Duration) -> Result<()> {
        let mut worker = lock(&self.worker);
        if self.is_running() {
            return Err(PrintError::AlreadyRunning);
        }

        if exposure.is_zero() {
            return Err(PrintError::InvalidExposure);
        }
        if frames.is_empty() {
            return Err(PrintError::InvalidFrameSet("frame set is empty".to_string()));
        }
        if frames.dimensions() != self.canvas.dimensions() {
            let (width, height) = frames.dimensions();
            return Err(PrintError::InvalidFrameSet(format!(
                "frames are {width}x{height}, canvas is {}x{}",
                self.canvas.target_width, self.canvas.target_height
            )));
        }

        // A cancelled worker may still be finishing its last frame; it is
        // reaped by wait() rather than joined here.
        if let Some(previous) = worker.handle.take() {
            if previous.is_finished() {
                worker.last_outcome = Some(join_worker(previous));
            } else {
                worker.retired.push(previous);
            }
        }

        let schedule = self.tick.schedule(exposure, frames.len());
        let (token, listener) = CancelToken::channel();

        let mut control = lock(&self.control);
        control.generation += 1;
        let session = Session {
            surface: Arc::clone(&self.surface),
            control: Arc::clone(&self.control),
            progress: Arc::clone(&self.progress),
            frames,
            schedule,
            listener,
            generation: control.generation,
        };

        self.progress.reset(schedule.ticks);
        let handle = thread::Builder::new()
            .name("print-display".to_string())
            .spawn(move || session.run())?;

        control.state = PrintState::Running;
        worker.cancel = Some(token);
        worker.handle = Some(handle);

        info!(
            exposure_ms = exposure.as_millis() as u64,
            ticks = schedule.ticks,
            "Print started"
        );
        Ok(())
    }

    /// Cancels the running session without waiting for the display. A frame
    /// already being drawn completes; no further frame is started. A no-op
    /// when nothing is running.
    pub fn stop(&self) {
        let worker = lock(&self.worker);
        let mut control = lock(&self.control);

        if control.state != PrintState::Running {
            debug!(state = ?control.state, "Stop requested with no running print");
            return;
        }

        if let Some(token) = &worker.cancel {
            token.cancel();
        }
        control.state = PrintState::Cancelled;
        info!("Print cancelled");
    }

    pub fn is_running(&self) -> bool {
        self.state() == PrintState::Running
    }

    pub fn state(&self) -> PrintState {
        lock(&self.control).state
    }

    pub fn progress(&self) -> PrintProgress {
        self.progress.snapshot()
    }

    /// Blocks until the current session ends and returns its outcome.
    /// Returns the previous outcome, if any, when no worker is pending.
    pub fn wait(&self) -> Option<PrintOutcome> {
        let (handle, retired) = {
            let mut worker = lock(&self.worker);
            (worker.handle.take(), std::mem::take(&mut worker.retired))
        };

        for previous in retired {
            join_worker(previous);
        }

        let Some(handle) = handle else {
            return self.last_outcome();
        };

        let outcome = join_worker(handle);
        lock(&self.worker).last_outcome = Some(outcome.clone());
        Some(outcome)
    }

    pub fn last_outcome(&self) -> Option<PrintOutcome> {
        lock(&self.worker).last_outcome.clone()
    }

    pub fn canvas(&self) -> &CanvasSpec {
        &self.canvas
    }
}

impl<D: DisplaySurface + 'static> Drop for Printer<D> {
    fn drop(&mut self) {
        self.stop();
        let _ = self.wait();
    }
}

fn join_worker(handle: JoinHandle<PrintOutcome>) -> PrintOutcome {
    handle
        .join()
        .unwrap_or_else(|_| PrintOutcome::Failed("display worker panicked".to_string()))
}
