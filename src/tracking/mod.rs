// Producer-side tracking state and adapters.
//
// The gaze producer and the target producer each write one shared point; the
// sampler reads both. Everything else in the pipeline is message-passing.

pub mod gaze;
pub mod shared;
pub mod target;

pub use gaze::{GazeAdapter, GazeData, GazeSource, SimulatedTracker, TrackerInfo};
pub use shared::{SharedPoint, TrackingState};
pub use target::TargetAdapter;
