use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag shared by the orchestrator and all workers.
/// Cloning yields a linked handle onto the same flag, so a front-end can keep
/// one and fire it from anywhere.
#[derive(Clone, Default)]
pub struct CancelToken {
  cancelled: Arc<AtomicBool>,
}

impl CancelToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.cancelled.store(true, Ordering::Relaxed);
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::Relaxed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clones_share_the_flag() {
    let token = CancelToken::new();
    let linked = token.clone();
    assert!(!linked.is_cancelled());
    token.cancel();
    assert!(linked.is_cancelled());
  }
}
