use crossbeam::queue::SegQueue;

use crate::structures::DownloadTask;

/// Size bucket of a download. Thresholds are 50 MiB and 5 MiB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
  Large,
  Medium,
  Small,
}

/// Three size-bucketed lock-free queues with work-stealing between tiers.
/// Large and Medium are filled in descending size so the longest transfers
/// start first; Small keeps insertion order.
pub struct TieredScheduler {
  pub(crate) large: SegQueue<DownloadTask>,
  pub(crate) medium: SegQueue<DownloadTask>,
  pub(crate) small: SegQueue<DownloadTask>,
}
