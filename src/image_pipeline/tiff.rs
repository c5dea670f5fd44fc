//! TIFF reading module
//!
//! Adapters that hand decoded 16-bit grayscale data to the pipeline. The
//! pipeline never writes processed images back to disk.

mod lut_store;
mod reader;
pub(crate) mod standard_tiff_reader;

pub use lut_store::{LutStore, read_tiff_file};
pub use reader::RasterReader;
pub use standard_tiff_reader::StandardTiffReader;
