// Live multi-series dashboard model - six channels of bounded history with
// live stats, a scrolling time window, CSV export, and a single owning task.

pub mod export;
pub mod model;
pub mod series;
pub mod service;

pub use model::{
    visible_window, ChannelSnapshot, Dashboard, DashboardSnapshot, SessionInfo, CHANNEL_COUNT,
    CHANNEL_LABELS, CHANNEL_NAMES, WINDOW_SECS,
};
pub use series::{SeriesBuffer, SeriesStats, SERIES_CAPACITY};
pub use service::{DashboardError, DashboardHandle};
