// gazelab - real-time gaze deviation analytics.
//
// Two producers (gaze tracker, object detection) write shared points, a
// periodic sampler turns them into offset/entropy samples, and a dashboard
// task records six bounded series with live stats and CSV export.

pub mod clock;
pub mod config;
pub mod dashboard;
pub mod metrics;
pub mod sampler;
pub mod tracking;
pub mod udp;

// Re-export the types most callers need.
pub use clock::SessionClock;
pub use config::AppConfig;
pub use dashboard::{DashboardHandle, DashboardSnapshot, SeriesStats};
pub use metrics::{compute_deviation, BoundingBox, DeviationSample, Point2D, Thresholds};
pub use tracking::{GazeAdapter, GazeData, GazeSource, TargetAdapter, TrackingState};
pub use udp::{UdpConfig, UdpService};
