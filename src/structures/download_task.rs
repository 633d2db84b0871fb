use std::path::PathBuf;

use crate::structures::ManifestEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
  Pending,
  Downloading,
  Verifying,
  Completed,
  Failed,
  Cancelled,
}

/// One queued or in-flight download. Owned by the scheduler while queued,
/// by a worker while in flight.
#[derive(Debug)]
pub struct DownloadTask {
  pub entry: ManifestEntry,
  /// Absolute destination path
  pub destination: PathBuf,
  pub status: TaskStatus,
  pub bytes_downloaded: u64,
  pub retry_count: u32,
  pub last_error: Option<String>,
}
