// Dashboard service task.
//
// All model mutation happens on one owning task; every other context talks
// to it through a queued handle. `update` is non-blocking and preserves
// sender order, so samples arrive in non-decreasing timestamp order.

use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::clock::SessionClock;
use crate::dashboard::export;
use crate::dashboard::model::{Dashboard, DashboardSnapshot, SessionInfo};
use crate::metrics::DeviationSample;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("dashboard service is no longer running")]
    Closed,
}

enum Command {
    Update(DeviationSample),
    Start { reply: oneshot::Sender<SessionInfo> },
    Stop { reply: oneshot::Sender<()> },
    Export { dir: PathBuf, reply: oneshot::Sender<Vec<PathBuf>> },
    Snapshot { reply: oneshot::Sender<DashboardSnapshot> },
    Shutdown,
}

/// Cheap cloneable handle to the dashboard task. Safe to use from any
/// context; `update` never blocks.
#[derive(Clone)]
pub struct DashboardHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl DashboardHandle {
    /// Feed one sample. Dropped with an error if the service is gone.
    pub fn update(&self, sample: DeviationSample) -> Result<(), DashboardError> {
        self.tx
            .send(Command::Update(sample))
            .map_err(|_| DashboardError::Closed)
    }

    pub async fn start_recording(&self) -> Result<SessionInfo, DashboardError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Start { reply })
            .map_err(|_| DashboardError::Closed)?;
        rx.await.map_err(|_| DashboardError::Closed)
    }

    pub async fn stop_recording(&self) -> Result<(), DashboardError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Stop { reply })
            .map_err(|_| DashboardError::Closed)?;
        rx.await.map_err(|_| DashboardError::Closed)
    }

    /// Export current channel history to `dir`; returns the files written.
    pub async fn export(&self, dir: impl Into<PathBuf>) -> Result<Vec<PathBuf>, DashboardError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Export { dir: dir.into(), reply })
            .map_err(|_| DashboardError::Closed)?;
        rx.await.map_err(|_| DashboardError::Closed)
    }

    pub async fn snapshot(&self) -> Result<DashboardSnapshot, DashboardError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Snapshot { reply })
            .map_err(|_| DashboardError::Closed)?;
        rx.await.map_err(|_| DashboardError::Closed)
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);
    }
}

/// Spawn the owning task for a fresh dashboard model.
pub fn spawn(clock: SessionClock) -> (DashboardHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(run(Dashboard::new(), clock, rx));
    (DashboardHandle { tx }, handle)
}

async fn run(mut dashboard: Dashboard, clock: SessionClock, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Update(sample) => dashboard.update(&sample),
            Command::Start { reply } => {
                let info = dashboard.start(clock.now());
                log::info!("🚀 recording started: session {}", info.session_id);
                let _ = reply.send(info);
            }
            Command::Stop { reply } => {
                dashboard.stop();
                log::info!("recording stopped");
                let _ = reply.send(());
            }
            Command::Export { dir, reply } => {
                // Snapshot on the owning task, write elsewhere so in-flight
                // appends keep draining.
                let snapshot = dashboard.snapshot();
                tokio::spawn(async move {
                    let written =
                        tokio::task::spawn_blocking(move || export::export_snapshot(&snapshot, &dir))
                            .await
                            .unwrap_or_default();
                    for path in &written {
                        log::info!("💾 exported {}", path.display());
                    }
                    let _ = reply.send(written);
                });
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(dashboard.snapshot());
            }
            Command::Shutdown => break,
        }
    }
    log::debug!("dashboard service stopped");
}
