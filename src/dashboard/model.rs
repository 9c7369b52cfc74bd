// Dashboard data model and recording state machine.
//
// Six channels mirror the sample vector: ΔX, ΔY, ΔR and the three entropy
// series. The model is synchronous and single-owner; `service` routes all
// mutation through one task.

use serde::Serialize;
use uuid::Uuid;

use crate::dashboard::series::{SeriesBuffer, SeriesStats};
use crate::metrics::DeviationSample;

pub const CHANNEL_COUNT: usize = 6;

/// Display labels, in sample-vector order.
pub const CHANNEL_LABELS: [&str; CHANNEL_COUNT] = ["ΔX", "ΔY", "ΔR", "Sx", "Sy", "Sr"];

/// File-safe channel names used for export artifacts.
pub const CHANNEL_NAMES: [&str; CHANNEL_COUNT] = [
    "delta_x", "delta_y", "delta_r", "entropy_x", "entropy_y", "entropy_r",
];

/// Visible time window of the scrolling plots, in seconds.
pub const WINDOW_SECS: f64 = 10.0;

/// Window to display for a given session-relative time: the full initial
/// window until it fills, then the trailing `WINDOW_SECS`.
pub fn visible_window(elapsed: f64) -> (f64, f64) {
    if elapsed > WINDOW_SECS {
        (elapsed - WINDOW_SECS, elapsed)
    } else {
        (0.0, WINDOW_SECS)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub started_at: String,
}

#[derive(Debug, Clone, Default)]
struct SessionState {
    running: bool,
    start_time: Option<f64>,
    info: Option<SessionInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelSnapshot {
    pub label: String,
    pub name: String,
    pub times: Vec<f64>,
    pub values: Vec<f64>,
    pub stats: Option<SeriesStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub running: bool,
    pub session: Option<SessionInfo>,
    pub window: (f64, f64),
    pub channels: Vec<ChannelSnapshot>,
}

pub struct Dashboard {
    channels: [SeriesBuffer; CHANNEL_COUNT],
    stats: [Option<SeriesStats>; CHANNEL_COUNT],
    session: SessionState,
    window: (f64, f64),
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            channels: std::array::from_fn(|_| SeriesBuffer::new()),
            stats: [None; CHANNEL_COUNT],
            session: SessionState::default(),
            window: (0.0, WINDOW_SECS),
        }
    }

    pub fn is_running(&self) -> bool {
        self.session.running
    }

    /// Begin recording. `now` is the current session clock reading; all
    /// samples of this recording are re-based against it.
    pub fn start(&mut self, now: f64) -> SessionInfo {
        if self.session.running {
            log::warn!("recording already running; restarting at t={:.3}", now);
        }

        let info = SessionInfo {
            session_id: Uuid::new_v4().to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
        };
        self.session = SessionState {
            running: true,
            start_time: Some(now),
            info: Some(info.clone()),
        };
        info
    }

    /// Stop recording. Retained history stays in place for export.
    pub fn stop(&mut self) {
        self.session.running = false;
        self.session.start_time = None;
    }

    /// Feed one sample. Ignored entirely while stopped.
    pub fn update(&mut self, sample: &DeviationSample) {
        if !self.session.running {
            return;
        }
        let Some(start_time) = self.session.start_time else {
            return;
        };

        let t = sample.t - start_time;
        for (i, value) in sample.channel_values().iter().enumerate() {
            self.channels[i].push(t, *value);
            self.stats[i] = self.channels[i].stats();
        }
        self.window = visible_window(t);
    }

    pub fn stats(&self, channel: usize) -> Option<SeriesStats> {
        self.stats.get(channel).copied().flatten()
    }

    pub fn window(&self) -> (f64, f64) {
        self.window
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let channels = (0..CHANNEL_COUNT)
            .map(|i| {
                let (times, values) = self.channels[i].snapshot();
                ChannelSnapshot {
                    label: CHANNEL_LABELS[i].to_string(),
                    name: CHANNEL_NAMES[i].to_string(),
                    times,
                    values,
                    stats: self.stats[i],
                }
            })
            .collect();

        DashboardSnapshot {
            running: self.session.running,
            session: self.session.info.clone(),
            window: self.window,
            channels,
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{compute_deviation, Point2D, Thresholds};

    fn sample_at(t: f64) -> DeviationSample {
        compute_deviation(
            &Point2D::new(150.0, 100.0),
            &Point2D::new(100.0, 100.0),
            &Thresholds::default(),
            t,
        )
    }

    #[test]
    fn updates_while_stopped_are_ignored() {
        let mut dashboard = Dashboard::new();
        dashboard.update(&sample_at(1.0));

        let snapshot = dashboard.snapshot();
        assert!(snapshot.channels.iter().all(|c| c.times.is_empty()));
        assert!(!snapshot.running);
    }

    #[test]
    fn running_appends_rebased_timestamps_to_all_channels() {
        let mut dashboard = Dashboard::new();
        dashboard.start(5.0);
        dashboard.update(&sample_at(5.25));
        dashboard.update(&sample_at(5.5));

        let snapshot = dashboard.snapshot();
        assert_eq!(snapshot.channels.len(), CHANNEL_COUNT);
        for channel in &snapshot.channels {
            assert_eq!(channel.times, vec![0.25, 0.5]);
            assert_eq!(channel.values.len(), 2);
        }
    }

    #[test]
    fn stop_freezes_buffers_but_keeps_history() {
        let mut dashboard = Dashboard::new();
        dashboard.start(0.0);
        dashboard.update(&sample_at(1.0));
        dashboard.stop();
        dashboard.update(&sample_at(2.0));

        let snapshot = dashboard.snapshot();
        assert_eq!(snapshot.channels[0].times, vec![1.0]);
    }

    #[test]
    fn restart_rebases_against_the_second_start() {
        let mut dashboard = Dashboard::new();
        dashboard.start(0.0);
        dashboard.update(&sample_at(1.0));
        dashboard.stop();

        let second = dashboard.start(10.0);
        dashboard.update(&sample_at(10.5));

        let snapshot = dashboard.snapshot();
        // First-session samples are not retroactively reindexed.
        assert_eq!(snapshot.channels[0].times, vec![1.0, 0.5]);
        assert_eq!(snapshot.session.unwrap().session_id, second.session_id);
    }

    #[test]
    fn restart_issues_a_fresh_session_id() {
        let mut dashboard = Dashboard::new();
        let first = dashboard.start(0.0);
        dashboard.stop();
        let second = dashboard.start(1.0);
        assert_ne!(first.session_id, second.session_id);
    }

    #[test]
    fn stats_track_appended_values() {
        let mut dashboard = Dashboard::new();
        dashboard.start(0.0);
        dashboard.update(&sample_at(1.0));

        let dx_stats = dashboard.stats(0).unwrap();
        assert_eq!(dx_stats.min, 50.0);
        assert_eq!(dx_stats.max, 50.0);
        assert_eq!(dx_stats.mean, 50.0);
        assert!(dashboard.stats(5).is_some());
    }

    #[test]
    fn window_scrolls_after_ten_seconds() {
        assert_eq!(visible_window(0.0), (0.0, 10.0));
        assert_eq!(visible_window(7.5), (0.0, 10.0));
        assert_eq!(visible_window(10.0), (0.0, 10.0));
        assert_eq!(visible_window(12.5), (2.5, 12.5));

        let mut dashboard = Dashboard::new();
        dashboard.start(0.0);
        dashboard.update(&sample_at(4.0));
        assert_eq!(dashboard.window(), (0.0, 10.0));
        dashboard.update(&sample_at(14.0));
        assert_eq!(dashboard.window(), (4.0, 14.0));
    }
}
