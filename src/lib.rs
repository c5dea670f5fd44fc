pub mod display;
pub mod enlarger;
pub mod image_pipeline;
pub mod logger;

pub use enlarger::Enlarger;
