use crossbeam::queue::SegQueue;

use crate::structures::{DownloadTask, Tier, TieredScheduler};

const LARGE_THRESHOLD: u64 = 50 * 1024 * 1024;
const MEDIUM_THRESHOLD: u64 = 5 * 1024 * 1024;

/// Worker counts affine to each tier. Large-file workers dominate aggregate
/// throughput; small-file workers keep short tasks from starving behind
/// head-of-line large transfers.
pub(crate) const LARGE_WORKERS: usize = 16;
pub(crate) const MEDIUM_WORKERS: usize = 6;
pub(crate) const SMALL_WORKERS: usize = 6;

impl Tier {
  pub fn for_size(size: u64) -> Tier {
    if size > LARGE_THRESHOLD {
      Tier::Large
    } else if size >= MEDIUM_THRESHOLD {
      Tier::Medium
    } else {
      Tier::Small
    }
  }

  /// Poll order for a worker with this affinity: own tier first, then the
  /// tier-specific fallback chain.
  pub(crate) fn poll_order(&self) -> [Tier; 3] {
    match self {
      Tier::Large => [Tier::Large, Tier::Medium, Tier::Small],
      Tier::Medium => [Tier::Medium, Tier::Small, Tier::Large],
      Tier::Small => [Tier::Small, Tier::Medium, Tier::Large],
    }
  }
}

impl TieredScheduler {
  pub fn new() -> Self {
    Self {
      large: SegQueue::new(),
      medium: SegQueue::new(),
      small: SegQueue::new(),
    }
  }

  /// Partitions the download set into tiers. Large and Medium are queued in
  /// descending size; Small keeps insertion order.
  pub fn enqueue_all(&self, tasks: Vec<DownloadTask>) {
    let mut large = Vec::new();
    let mut medium = Vec::new();
    for task in tasks {
      match Tier::for_size(task.entry.size) {
        Tier::Large => large.push(task),
        Tier::Medium => medium.push(task),
        Tier::Small => self.small.push(task),
      }
    }
    large.sort_by(|a, b| b.entry.size.cmp(&a.entry.size));
    medium.sort_by(|a, b| b.entry.size.cmp(&a.entry.size));
    for task in large {
      self.large.push(task);
    }
    for task in medium {
      self.medium.push(task);
    }
  }

  pub fn try_dequeue_large(&self) -> Option<DownloadTask> {
    self.large.pop()
  }

  pub fn try_dequeue_medium(&self) -> Option<DownloadTask> {
    self.medium.pop()
  }

  pub fn try_dequeue_small(&self) -> Option<DownloadTask> {
    self.small.pop()
  }

  /// Non-blocking acquire following the worker's poll order. `None` means
  /// all three queues were empty and the worker should terminate.
  pub fn acquire(&self, affinity: Tier) -> Option<DownloadTask> {
    for tier in affinity.poll_order() {
      let task = match tier {
        Tier::Large => self.try_dequeue_large(),
        Tier::Medium => self.try_dequeue_medium(),
        Tier::Small => self.try_dequeue_small(),
      };
      if task.is_some() {
        return task;
      }
    }
    None
  }

  /// Puts a task back into the tier matching its size, not the affinity of
  /// whichever worker held it.
  pub fn requeue(&self, task: DownloadTask) {
    match Tier::for_size(task.entry.size) {
      Tier::Large => self.large.push(task),
      Tier::Medium => self.medium.push(task),
      Tier::Small => self.small.push(task),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.large.is_empty() && self.medium.is_empty() && self.small.is_empty()
  }

  pub fn len(&self) -> usize {
    self.large.len() + self.medium.len() + self.small.len()
  }
}

impl Default for TieredScheduler {
  fn default() -> Self {
    Self::new()
  }
}
