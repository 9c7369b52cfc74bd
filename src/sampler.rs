// Periodic sampler.
//
// Pulls the current gaze/target points at a fixed wall-clock interval,
// independent of producer rates, and forwards the computed sample to the
// dashboard. A forward failure is logged and dropped; it never stops the
// loop.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::clock::SessionClock;
use crate::dashboard::DashboardHandle;
use crate::metrics::{compute_deviation, Thresholds};
use crate::tracking::TrackingState;

pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(10);

pub struct SamplerHandle {
    stop_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl SamplerHandle {
    /// Stop the repeating timer and wait for the loop to exit.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(()).await;
        let _ = self.handle.await;
    }
}

pub fn start(
    tracking: TrackingState,
    thresholds: Thresholds,
    clock: SessionClock,
    dashboard: DashboardHandle,
    interval: Duration,
) -> SamplerHandle {
    let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // A stalled tick is dropped rather than replayed in a burst, keeping
        // timestamps evenly spaced.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = stop_rx.recv() => break,
                _ = ticker.tick() => {
                    let gaze = tracking.gaze.get();
                    let target = tracking.target.get();
                    let sample = compute_deviation(&gaze, &target, &thresholds, clock.now());

                    if let Err(e) = dashboard.update(sample) {
                        log::warn!("graph update error: {}", e);
                    }
                }
            }
        }
        log::debug!("sampler stopped");
    });

    SamplerHandle { stop_tx, handle }
}
