use crate::display::error::DisplayError;
use crate::image_pipeline::Frame;

/// Secondary display that blits 8-bit monochrome frames at canvas
/// resolution. Window and monitor placement belong to the implementor.
pub trait DisplaySurface: Send {
    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError>;

    /// Blanks the display once a session ends.
    fn clear(&mut self) {}
}
