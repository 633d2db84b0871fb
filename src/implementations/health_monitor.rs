use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::structures::{ErrorKind, HealthMonitor};

/// Errors older than this fall out of the rolling window.
const WINDOW: Duration = Duration::from_secs(5 * 60);
/// Live errors needed before the pool is called unhealthy.
const UNHEALTHY_THRESHOLD: usize = 50;
/// The unhealthy signal fires at most this often.
const SIGNAL_INTERVAL: Duration = Duration::from_secs(10 * 60);
/// How often the piggybacked periodic check actually runs.
const CHECK_INTERVAL: Duration = Duration::from_secs(30);

impl HealthMonitor {
  pub fn new() -> Self {
    Self {
      total_requests: AtomicU64::new(0),
      total_errors: AtomicU64::new(0),
      window: parking_lot::Mutex::new(VecDeque::new()),
      last_signal: parking_lot::Mutex::new(None),
      last_check_ms: AtomicU64::new(0),
      checking: AtomicBool::new(false),
      started: Instant::now(),
    }
  }

  pub fn notify_success(&self) {
    self.total_requests.fetch_add(1, Ordering::Relaxed);
  }

  pub fn notify_error(&self, kind: ErrorKind) {
    self.total_requests.fetch_add(1, Ordering::Relaxed);
    self.total_errors.fetch_add(1, Ordering::Relaxed);
    let mut window = self.window.lock();
    window.push_back((Instant::now(), kind));
    Self::expire(&mut window);
  }

  pub fn total_requests(&self) -> u64 {
    self.total_requests.load(Ordering::Relaxed)
  }

  pub fn total_errors(&self) -> u64 {
    self.total_errors.load(Ordering::Relaxed)
  }

  /// Number of errors currently inside the five-minute window.
  pub fn live_errors(&self) -> usize {
    let mut window = self.window.lock();
    Self::expire(&mut window);
    window.len()
  }

  /// True at most once per ten minutes, and only while at least fifty errors
  /// are live in the window.
  pub fn should_reset_pool(&self) -> bool {
    if self.live_errors() < UNHEALTHY_THRESHOLD {
      return false;
    }
    let mut last = self.last_signal.lock();
    match *last {
      Some(at) if at.elapsed() < SIGNAL_INTERVAL => false,
      _ => {
        *last = Some(Instant::now());
        true
      },
    }
  }

  /// Cheap periodic check piggybacked on worker iterations; runs the real
  /// check once per ~30 s regardless of how many workers call it.
  pub(crate) fn maybe_recommend_reset(&self) {
    let now_ms = self.started.elapsed().as_millis() as u64;
    let last = self.last_check_ms.load(Ordering::Relaxed);
    if now_ms.saturating_sub(last) < CHECK_INTERVAL.as_millis() as u64 {
      return;
    }
    if self.checking.swap(true, Ordering::Acquire) {
      return;
    }
    self.last_check_ms.store(now_ms, Ordering::Relaxed);
    if self.should_reset_pool() {
      warn!(
        live_errors = self.live_errors(),
        total_errors = self.total_errors(),
        "Connection pool looks unhealthy; consider reducing download concurrency"
      );
    }
    self.checking.store(false, Ordering::Release);
  }

  /// Drops expired entries from the front. Pushes only ever append and this
  /// only ever pops the front, so the deque stays oldest-first and the scan
  /// can stop at the first still-live entry.
  fn expire(window: &mut VecDeque<(Instant, ErrorKind)>) {
    while let Some((at, _)) = window.front() {
      if at.elapsed() >= WINDOW {
        window.pop_front();
      } else {
        break;
      }
    }
  }
}

impl Default for HealthMonitor {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn successes_do_not_count_as_errors() {
    let monitor = HealthMonitor::new();
    monitor.notify_success();
    monitor.notify_success();
    monitor.notify_error(ErrorKind::Timeout);
    assert_eq!(monitor.total_requests(), 3);
    assert_eq!(monitor.total_errors(), 1);
    assert_eq!(monitor.live_errors(), 1);
  }

  #[test]
  fn signal_needs_fifty_live_errors() {
    let monitor = HealthMonitor::new();
    for _ in 0..49 {
      monitor.notify_error(ErrorKind::ServerStatus5xx);
    }
    assert!(!monitor.should_reset_pool());
    monitor.notify_error(ErrorKind::ServerStatus5xx);
    assert!(monitor.should_reset_pool());
  }

  #[test]
  fn signal_is_rate_limited() {
    let monitor = HealthMonitor::new();
    for _ in 0..60 {
      monitor.notify_error(ErrorKind::ConnectionReset);
    }
    assert!(monitor.should_reset_pool());
    // the window is still full, but the signal already fired
    assert!(!monitor.should_reset_pool());
  }

  #[test]
  fn expiry_drops_stale_entries_oldest_first() {
    let monitor = HealthMonitor::new();
    // a monotonic clock close to its origin cannot represent this instant
    let Some(stale) = Instant::now().checked_sub(WINDOW + Duration::from_secs(1)) else { return };
    {
      let mut window = monitor.window.lock();
      window.push_back((stale, ErrorKind::Timeout));
      window.push_back((stale, ErrorKind::Timeout));
      window.push_back((Instant::now(), ErrorKind::Timeout));
    }
    assert_eq!(monitor.live_errors(), 1);
    // lifetime totals are monotonic and unaffected by expiry
    assert_eq!(monitor.total_errors(), 0);
  }
}
