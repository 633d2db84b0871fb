use tracing::{info, warn};

use crate::structures::DownloadTask;

/// Sink for the orchestrator's observable events. All methods default to
/// no-ops so implementors only override what they display.
pub trait SyncObserver: Send + Sync {
  fn on_scan_progress(&self, _scanned: u64, _total: u64) {}
  fn on_download_started(&self, _total: u64) {}
  fn on_download_progress(&self, _worker_id: usize, _task: &DownloadTask, _bytes_done: u64, _bytes_total: u64) {}
  fn on_file_verified(&self, _worker_id: usize, _task: &DownloadTask, _ok: bool) {}
  fn on_download_completed(&self, _ok: bool, _succeeded: u64, _failed: u64, _cancelled: u64) {}
}

/// Discards every event; for headless runs and tests.
pub struct NullObserver;

impl SyncObserver for NullObserver { }

/// Logs events through tracing; what the CLI front-end uses.
pub struct TracingObserver;

/// Binary units, the same scale the size tiers are defined in.
fn human_bytes(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
  if bytes < 1024 {
    return format!("{} B", bytes);
  }
  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit < UNITS.len() - 1 {
    value /= 1024.0;
    unit += 1;
  }
  format!("{:.1} {}", value, UNITS[unit])
}

impl SyncObserver for TracingObserver {
  fn on_scan_progress(&self, scanned: u64, total: u64) {
    info!("Checked {} out of {} files", scanned, total);
  }

  fn on_download_started(&self, total: u64) {
    info!("Downloading {} files", total);
  }

  fn on_download_progress(&self, worker_id: usize, task: &DownloadTask, bytes_done: u64, bytes_total: u64) {
    info!(
      "[{:02}] {} {}/{}",
      worker_id,
      task.entry.rel_path,
      human_bytes(bytes_done),
      human_bytes(bytes_total)
    );
  }

  fn on_file_verified(&self, worker_id: usize, task: &DownloadTask, ok: bool) {
    if ok {
      info!("[{:02}] Verified {}", worker_id, task.entry.rel_path);
    } else {
      warn!(
        "[{:02}] Failed {}: {}",
        worker_id,
        task.entry.rel_path,
        task.last_error.as_deref().unwrap_or("unknown error")
      );
    }
  }

  fn on_download_completed(&self, ok: bool, succeeded: u64, failed: u64, cancelled: u64) {
    if ok {
      info!("Synchronization complete: {} files downloaded", succeeded);
    } else {
      warn!(
        "Synchronization finished with problems: {} succeeded, {} failed, {} cancelled",
        succeeded, failed, cancelled
      );
    }
  }
}
