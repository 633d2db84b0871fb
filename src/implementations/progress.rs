use std::sync::atomic::{AtomicU64, Ordering};

use crate::structures::Progress;

impl Progress {
  pub fn new(total: u64) -> Self {
    Self {
      total: AtomicU64::new(total),
      completed: AtomicU64::new(0),
      failed: AtomicU64::new(0),
      cancelled: AtomicU64::new(0),
    }
  }

  pub(crate) fn note_completed(&self) {
    self.completed.fetch_add(1, Ordering::Relaxed);
  }

  pub(crate) fn note_failed(&self) {
    self.failed.fetch_add(1, Ordering::Relaxed);
  }

  pub(crate) fn note_cancelled(&self) {
    self.cancelled.fetch_add(1, Ordering::Relaxed);
  }

  pub fn total(&self) -> u64 {
    self.total.load(Ordering::Relaxed)
  }

  /// (completed, failed, cancelled)
  pub fn snapshot(&self) -> (u64, u64, u64) {
    (
      self.completed.load(Ordering::Relaxed),
      self.failed.load(Ordering::Relaxed),
      self.cancelled.load(Ordering::Relaxed),
    )
  }

  pub fn still_queued(&self) -> u64 {
    let (completed, failed, cancelled) = self.snapshot();
    self.total().saturating_sub(completed + failed + cancelled)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn counters_always_account_for_the_whole_set() {
    let progress = Progress::new(5);
    progress.note_completed();
    progress.note_completed();
    progress.note_failed();
    assert_eq!(progress.snapshot(), (2, 1, 0));
    assert_eq!(progress.still_queued(), 2);
    progress.note_cancelled();
    progress.note_cancelled();
    assert_eq!(progress.still_queued(), 0);
  }
}
