// Application settings persistence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::metrics::Thresholds;
use crate::sampler::DEFAULT_SAMPLE_INTERVAL;
use crate::udp::UdpConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Screen resolution used to scale normalized gaze coordinates.
    pub screen_width: f64,
    pub screen_height: f64,

    /// Dead-zone thresholds in pixels, per axis.
    pub x_threshold: f64,
    pub y_threshold: f64,

    /// Sampler period in milliseconds.
    pub sample_interval_ms: u64,

    /// Directory CSV exports are written into.
    pub export_dir: PathBuf,

    /// Use the software gaze producer instead of a hardware tracker.
    pub use_simulated_tracker: bool,
    pub simulated_gaze_rate_hz: f64,

    /// Endpoint record for the UDP helper; the feature is skipped when
    /// absent.
    pub udp: Option<UdpConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            screen_width: 1920.0,
            screen_height: 1080.0,
            x_threshold: 25.0,
            y_threshold: 25.0,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL.as_millis() as u64,
            export_dir: PathBuf::from("exports"),
            use_simulated_tracker: true,
            simulated_gaze_rate_hz: 90.0,
            udp: None,
        }
    }
}

impl AppConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.x_threshold, self.y_threshold)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms.max(1))
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("gazelab").join("settings.json"))
        .unwrap_or_else(|| PathBuf::from("settings.json"))
}

/// Load settings from `path` (or the default location). A missing file
/// yields the defaults; a malformed file is a startup error.
pub fn load_or_default(path: Option<&Path>) -> Result<AppConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    if !path.exists() {
        log::info!("no settings file at {}; using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    let config: AppConfig = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse settings file {}", path.display()))?;

    log::info!("📂 settings loaded from {}", path.display());
    Ok(config)
}

pub fn save(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(config).context("failed to serialize settings")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write settings file {}", path.display()))?;

    log::info!("💾 settings saved to {}", path.display());
    Ok(())
}
