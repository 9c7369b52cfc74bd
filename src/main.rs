use std::path::PathBuf;

use anyhow::Result;
use env_logger::Env;

use gazelab::clock::SessionClock;
use gazelab::config;
use gazelab::dashboard;
use gazelab::metrics::Point2D;
use gazelab::sampler;
use gazelab::tracking::{GazeAdapter, GazeSource, SimulatedTracker, TargetAdapter, TrackingState};
use gazelab::udp::UdpService;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = config::load_or_default(config_path.as_deref())?;

    let tracking = TrackingState::default();
    let clock = SessionClock::start();

    // Connect the gaze producer.
    if !config.use_simulated_tracker {
        anyhow::bail!("no eye tracker found");
    }
    let mut tracker = SimulatedTracker::new(config.simulated_gaze_rate_hz);
    let info = tracker.connect().await?;
    log::info!("Address: {}", info.address);
    log::info!("Model: {}", info.model);
    log::info!(
        "Name: {}",
        if info.device_name.is_empty() { "(Unnamed)" } else { info.device_name.as_str() }
    );
    log::info!("Serial number: {}", info.serial_number);

    let gaze_adapter = GazeAdapter::new(
        tracking.gaze.clone(),
        config.screen_width,
        config.screen_height,
    );
    tracker.subscribe(Box::new(move |data| gaze_adapter.on_gaze_data(&data)))?;

    // The detection loop feeds targets through this adapter; until its first
    // frame the target sits at the screen center.
    let target_adapter = TargetAdapter::new(tracking.target.clone());
    target_adapter.on_center(Point2D::new(
        config.screen_width / 2.0,
        config.screen_height / 2.0,
    ));

    // Optional UDP helper for the external client.
    let mut udp = match &config.udp {
        Some(udp_config) => {
            let mut service = UdpService::new(udp_config.clone())?;
            service.set_data_handler(|data| {
                log::info!("UDP message received ({} bytes)", data.len());
            });
            service.start_receiving();
            Some(service)
        }
        None => None,
    };

    let (dashboard, dashboard_task) = dashboard::service::spawn(clock);
    let sampler = sampler::start(
        tracking.clone(),
        config.thresholds(),
        clock,
        dashboard.clone(),
        config.sample_interval(),
    );

    let session = dashboard.start_recording().await?;
    log::info!("recording session {} (ctrl-c to stop and export)", session.session_id);

    // Block until ctrl-c.
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::unbounded_channel::<()>();
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(());
    })?;
    shutdown_rx.recv().await;

    log::info!("shutting down");
    sampler.stop().await;
    dashboard.stop_recording().await?;

    let written = dashboard.export(&config.export_dir).await?;
    if written.is_empty() {
        log::warn!("nothing recorded; no export written");
    }

    tracker.stop().await;
    if let Some(service) = udp.as_mut() {
        service.close();
    }
    dashboard.shutdown();
    let _ = dashboard_task.await;

    Ok(())
}
