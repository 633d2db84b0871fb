use std::sync::atomic::AtomicU64;

/// Shared per-run counters, updated by workers.
/// `total - completed - failed - cancelled` is the number still queued.
pub struct Progress {
  pub(crate) total: AtomicU64,
  pub(crate) completed: AtomicU64,
  pub(crate) failed: AtomicU64,
  pub(crate) cancelled: AtomicU64,
}
