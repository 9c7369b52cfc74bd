// CSV export of recorded channel data.
//
// One artifact per channel, named by channel and export timestamp. A
// channel with nothing to write, or with a time/value length mismatch, is
// skipped without aborting the remaining channels.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::dashboard::model::{ChannelSnapshot, DashboardSnapshot};

/// Write every exportable channel of the snapshot into `dir`.
///
/// Returns the paths written. Failures are per-channel: logged and skipped.
pub fn export_snapshot(snapshot: &DashboardSnapshot, dir: &Path) -> Vec<PathBuf> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        log::error!("failed to create export directory {}: {}", dir.display(), e);
        return Vec::new();
    }

    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S%3f").to_string();
    let mut written = Vec::new();

    for channel in &snapshot.channels {
        if channel.times.is_empty() || channel.times.len() != channel.values.len() {
            log::debug!("skipping export of channel {}: nothing to write", channel.name);
            continue;
        }

        let path = dir.join(format!("{}_{}.csv", channel.name, stamp));
        match write_channel_csv(&path, channel) {
            Ok(()) => written.push(path),
            Err(e) => log::error!("failed to export channel {}: {}", channel.name, e),
        }
    }

    written
}

fn write_channel_csv(path: &Path, channel: &ChannelSnapshot) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    writeln!(writer, "Time,Value")?;
    for (t, v) in channel.times.iter().zip(channel.values.iter()) {
        writeln!(writer, "{:.6},{:.6}", t, v)?;
    }
    writer.flush()
}
