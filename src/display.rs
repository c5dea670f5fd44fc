//! Display loop module
//!
//! Presents a prepared frame set on the secondary display for the exposure
//! time, cycling frames on a background worker so the caller stays free to
//! stop the print.

mod error;
mod headless;
mod preview;
mod printer;
mod session;
mod surface;


pub use error::{DisplayError, PrintError, Result};
pub use headless::HeadlessSurface;
pub use preview::{PREVIEW_HEIGHT, PREVIEW_WIDTH, PreviewHandle, PreviewSurface};
pub use printer::Printer;
pub use session::{PrintOutcome, PrintProgress, PrintState};
pub use surface::DisplaySurface;
