//! Pipeline conversions module
//!
//! This module contains the orchestration that turns a source raster into a
//! print-ready frame set.

mod print_pipeline;


pub use print_pipeline::PrintPipeline;
