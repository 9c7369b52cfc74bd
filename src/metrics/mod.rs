// Gaze/target deviation metrics - pure math, no state

pub mod entropy;
pub mod offset;
pub mod types;

pub use entropy::compute_deviation;
pub use offset::{center_offset, BoundingBox};
pub use types::{DeviationSample, Point2D, Thresholds};
