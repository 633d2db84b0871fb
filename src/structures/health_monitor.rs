use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicBool};
use std::time::Instant;

use crate::structures::ErrorKind;

/// Rolling five-minute window of classified errors plus lifetime totals.
/// Workers bump the totals with atomic increments; the window itself is a
/// chronological deque behind a short-lived lock, purged at every
/// observation. The "pool is unhealthy" signal fires at most once per ten
/// minutes.
pub struct HealthMonitor {
  pub(crate) total_requests: AtomicU64,
  pub(crate) total_errors: AtomicU64,
  pub(crate) window: parking_lot::Mutex<VecDeque<(Instant, ErrorKind)>>,
  pub(crate) last_signal: parking_lot::Mutex<Option<Instant>>,
  /// Millis since `started` of the last periodic check, 0 = never
  pub(crate) last_check_ms: AtomicU64,
  pub(crate) checking: AtomicBool,
  pub(crate) started: Instant,
}
