//! The seam to the external diffeomorph pipeline.

mod interface;

pub use interface::DiffeoPipeline;
