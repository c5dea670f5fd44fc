//! One print session: the worker that cycles frames on the display

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::display::surface::DisplaySurface;
use crate::image_pipeline::{FrameSet, TickSchedule};

/// Lifecycle of the print control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintState {
    Idle,
    Running,
    Cancelled,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOutcome {
    Completed { frames_presented: u64 },
    Cancelled { frames_presented: u64 },
    Failed(String),
}

impl PrintOutcome {
    /// State the printer settles in once a session has ended this way.
    pub(crate) fn settled_state(&self) -> PrintState {
        match self {
            PrintOutcome::Cancelled { .. } => PrintState::Cancelled,
            PrintOutcome::Completed { .. } | PrintOutcome::Failed(_) => PrintState::Idle,
        }
    }
}

/// Snapshot of a session's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrintProgress {
    pub frames_presented: u64,
    pub total_ticks: u64,
}

impl PrintProgress {
    pub fn fraction(&self) -> f64 {
        if self.total_ticks == 0 {
            return 0.0;
        }
        self.frames_presented as f64 / self.total_ticks as f64
    }
}

#[derive(Debug, Default)]
pub(crate) struct SessionProgress {
    presented: AtomicU64,
    total: AtomicU64,
}

impl SessionProgress {
    pub(crate) fn reset(&self, total_ticks: u64) {
        self.presented.store(0, Ordering::Relaxed);
        self.total.store(total_ticks, Ordering::Relaxed);
    }

    fn record(&self, presented: u64) {
        self.presented.store(presented, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> PrintProgress {
        PrintProgress {
            frames_presented: self.presented.load(Ordering::Relaxed),
            total_ticks: self.total.load(Ordering::Relaxed),
        }
    }
}

/// Control side of a cancellation channel.
#[derive(Debug)]
pub(crate) struct CancelToken {
    tx: Sender<()>,
}

/// Worker side of a cancellation channel. Dropping the token counts as
/// cancellation, so an abandoned worker never outlives its controller.
#[derive(Debug)]
pub(crate) struct CancelListener {
    rx: Receiver<()>,
    cancelled: Cell<bool>,
}

impl CancelToken {
    pub(crate) fn channel() -> (CancelToken, CancelListener) {
        let (tx, rx) = mpsc::channel();
        (
            CancelToken { tx },
            CancelListener {
                rx,
                cancelled: Cell::new(false),
            },
        )
    }

    pub(crate) fn cancel(&self) {
        // The worker may already be gone.
        let _ = self.tx.send(());
    }
}

impl CancelListener {
    pub(crate) fn is_cancelled(&self) -> bool {
        if self.cancelled.get() {
            return true;
        }
        let cancelled = match self.rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => true,
            Err(TryRecvError::Empty) => false,
        };
        self.cancelled.set(cancelled);
        cancelled
    }

    /// Blocks until `deadline` or cancellation, whichever comes first.
    /// Returns true when cancelled.
    pub(crate) fn wait_until(&self, deadline: Instant) -> bool {
        if self.is_cancelled() {
            return true;
        }
        let Some(timeout) = deadline.checked_duration_since(Instant::now()) else {
            return false;
        };
        let cancelled = match self.rx.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => false,
        };
        self.cancelled.set(cancelled);
        cancelled
    }
}

/// Session bookkeeping shared between the printer and its worker.
#[derive(Debug)]
pub(crate) struct Control {
    pub(crate) state: PrintState,
    pub(crate) generation: u64,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking surface must not wedge the control surface.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Everything a worker thread owns for one session.
pub(crate) struct Session<D> {
    pub(crate) surface: Arc<Mutex<D>>,
    pub(crate) control: Arc<Mutex<Control>>,
    pub(crate) progress: Arc<SessionProgress>,
    pub(crate) frames: FrameSet,
    pub(crate) schedule: TickSchedule,
    pub(crate) listener: CancelListener,
    pub(crate) generation: u64,
}

impl<D: DisplaySurface> Session<D> {
    /// Worker entry point. Presents frames in cyclic order until the
    /// schedule is exhausted or the session is cancelled, then releases the
    /// display.
    pub(crate) fn run(self) -> PrintOutcome {
        info!(
            generation = self.generation,
            frames = self.frames.len(),
            ticks = self.schedule.ticks,
            interval_us = self.schedule.interval.as_micros() as u64,
            "Print session started"
        );

        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| self.present_frames())) {
            Ok(outcome) => outcome,
            Err(_) => PrintOutcome::Failed("display surface panicked".to_string()),
        };

        self.finish(&outcome);
        outcome
    }

    fn present_frames(&self) -> PrintOutcome {
        let frames = self.frames.frames();
        let mut deadline = Instant::now();
        let mut presented: u64 = 0;

        loop {
            if presented == self.schedule.ticks {
                return PrintOutcome::Completed {
                    frames_presented: presented,
                };
            }

            {
                // Checked right before presenting: after stop() at most the
                // frame already being drawn completes.
                let mut surface = lock(&self.surface);
                if self.listener.is_cancelled() {
                    return PrintOutcome::Cancelled {
                        frames_presented: presented,
                    };
                }

                let index = (presented % frames.len() as u64) as usize;
                if let Err(e) = surface.present(&frames[index]) {
                    warn!(error = %e, tick = presented, "Display surface rejected frame");
                    return PrintOutcome::Failed(e.to_string());
                }
                presented += 1;
                self.progress.record(presented);
            }

            deadline += self.schedule.interval;
            if self.listener.wait_until(deadline) {
                return PrintOutcome::Cancelled {
                    frames_presented: presented,
                };
            }
        }
    }

    fn finish(&self, outcome: &PrintOutcome) {
        // Holding the display lock keeps a newer session from presenting
        // before this one has cleared.
        let mut surface = lock(&self.surface);
        {
            let mut control = lock(&self.control);
            if control.generation != self.generation {
                debug!(generation = self.generation, "Superseded session exiting");
                return;
            }
            // The outcome wins over a stop() that raced with the last tick.
            control.state = outcome.settled_state();
        }
        surface.clear();

        match outcome {
            PrintOutcome::Completed { frames_presented } => {
                info!(frames_presented, "Print session completed")
            }
            PrintOutcome::Cancelled { frames_presented } => {
                info!(frames_presented, "Print session cancelled")
            }
            PrintOutcome::Failed(reason) => warn!(%reason, "Print session failed"),
        }
    }
}
