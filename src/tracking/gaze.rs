// Gaze producer interface and adapters.
//
// Hardware trackers deliver normalized display coordinates through a
// vendor callback; `GazeSource` is the capability boundary so the pipeline
// never sees a vendor API shape. `SimulatedTracker` drives the same path
// without hardware.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::metrics::Point2D;
use crate::tracking::shared::SharedPoint;

/// One gaze delivery: left and right eye points, normalized to [0,1]².
/// Coordinates are NaN when the tracker loses the corresponding eye.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GazeData {
    pub left: Point2D,
    pub right: Point2D,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerInfo {
    pub address: String,
    pub model: String,
    pub device_name: String,
    pub serial_number: String,
}

pub type GazeHandler = Box<dyn Fn(GazeData) + Send + Sync>;

/// Capability interface for a gaze producer.
#[async_trait]
pub trait GazeSource: Send {
    /// Establish the connection and return device metadata.
    async fn connect(&mut self) -> Result<TrackerInfo>;

    /// Begin delivering gaze data to the handler until stopped.
    fn subscribe(&mut self, handler: GazeHandler) -> Result<()>;

    /// Stop delivery and release the background context.
    async fn stop(&mut self);
}

/// Converts normalized gaze deliveries to frame pixels and writes the shared
/// gaze point: average of left and right, scaled by the screen resolution.
#[derive(Debug, Clone)]
pub struct GazeAdapter {
    shared: SharedPoint,
    screen_width: f64,
    screen_height: f64,
}

impl GazeAdapter {
    pub fn new(shared: SharedPoint, screen_width: f64, screen_height: f64) -> Self {
        Self { shared, screen_width, screen_height }
    }

    pub fn on_gaze_data(&self, data: &GazeData) {
        let x = (data.left.x + data.right.x) / 2.0 * self.screen_width;
        let y = (data.left.y + data.right.y) / 2.0 * self.screen_height;
        let point = Point2D::new(x, y);

        // The tracker reports NaN while it cannot see the eyes; keep the
        // previous fix instead of poisoning downstream metrics.
        if !point.is_finite() {
            log::trace!("discarding non-finite gaze delivery");
            return;
        }

        self.shared.set(point);
    }
}

/// Software gaze producer: a smooth bounded random walk over the normalized
/// display area, delivered at a fixed rate.
pub struct SimulatedTracker {
    rate_hz: f64,
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SimulatedTracker {
    pub fn new(rate_hz: f64) -> Self {
        Self {
            rate_hz: rate_hz.max(1.0),
            stop_tx: None,
            handle: None,
        }
    }
}

#[async_trait]
impl GazeSource for SimulatedTracker {
    async fn connect(&mut self) -> Result<TrackerInfo> {
        Ok(TrackerInfo {
            address: "sim://local".to_string(),
            model: "Simulated Tracker".to_string(),
            device_name: String::new(),
            serial_number: "SIM-0000".to_string(),
        })
    }

    fn subscribe(&mut self, handler: GazeHandler) -> Result<()> {
        if self.handle.is_some() {
            log::warn!("gaze delivery is already running");
            return Ok(());
        }

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        let interval = Duration::from_secs_f64(1.0 / self.rate_hz);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut rng = StdRng::from_entropy();
            let mut x: f64 = 0.5;
            let mut y: f64 = 0.5;

            loop {
                tokio::select! {
                    _ = stop_rx.recv() => break,
                    _ = ticker.tick() => {
                        x = (x + rng.gen_range(-0.01..0.01)).clamp(0.0, 1.0);
                        y = (y + rng.gen_range(-0.01..0.01)).clamp(0.0, 1.0);

                        // Both eyes jitter independently around the fixation.
                        let left = Point2D::new(
                            (x + rng.gen_range(-0.002..0.002)).clamp(0.0, 1.0),
                            (y + rng.gen_range(-0.002..0.002)).clamp(0.0, 1.0),
                        );
                        let right = Point2D::new(
                            (x + rng.gen_range(-0.002..0.002)).clamp(0.0, 1.0),
                            (y + rng.gen_range(-0.002..0.002)).clamp(0.0, 1.0),
                        );

                        handler(GazeData { left, right });
                    }
                }
            }
            log::debug!("simulated gaze delivery stopped");
        });

        self.stop_tx = Some(stop_tx);
        self.handle = Some(handle);
        Ok(())
    }

    async fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn adapter_averages_eyes_and_scales_to_pixels() {
        let shared = SharedPoint::default();
        let adapter = GazeAdapter::new(shared.clone(), 1000.0, 500.0);

        adapter.on_gaze_data(&GazeData {
            left: Point2D::new(0.4, 0.4),
            right: Point2D::new(0.6, 0.6),
        });

        assert_eq!(shared.get(), Point2D::new(500.0, 250.0));
    }

    #[test]
    fn non_finite_delivery_keeps_previous_fix() {
        let shared = SharedPoint::new(Point2D::new(100.0, 100.0));
        let adapter = GazeAdapter::new(shared.clone(), 1000.0, 500.0);

        adapter.on_gaze_data(&GazeData {
            left: Point2D::new(f64::NAN, 0.5),
            right: Point2D::new(0.5, 0.5),
        });

        assert_eq!(shared.get(), Point2D::new(100.0, 100.0));
    }

    #[tokio::test]
    async fn simulated_tracker_delivers_normalized_points_until_stopped() {
        let mut tracker = SimulatedTracker::new(200.0);
        let info = tracker.connect().await.unwrap();
        assert_eq!(info.model, "Simulated Tracker");

        let delivered = Arc::new(AtomicUsize::new(0));
        let counter = delivered.clone();
        tracker
            .subscribe(Box::new(move |data| {
                assert!((0.0..=1.0).contains(&data.left.x));
                assert!((0.0..=1.0).contains(&data.left.y));
                assert!((0.0..=1.0).contains(&data.right.x));
                assert!((0.0..=1.0).contains(&data.right.y));
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        tracker.stop().await;

        assert!(delivered.load(Ordering::SeqCst) > 0);
    }
}
