use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::cancellation::CancelToken;
use crate::functions::{flow, FlowContext};
use crate::structures::{ClientSelection, DigestCache, Error, ScanPolicy};
use crate::synchronizer_builder::SynchronizerBuilder;
use crate::traits::{RemoteSource, SyncObserver};

/// Outcome counts of one run. Partial success is a first-class result; a
/// non-zero failed count just means the next run has less to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
  pub succeeded: u64,
  pub failed: u64,
  pub cancelled: u64,
}

impl RunReport {
  pub fn all_succeeded(&self) -> bool {
    self.failed == 0 && self.cancelled == 0
  }
}

/// Top-level driver: sequences manifest retrieval, scan, tiered download and
/// cache flush, reporting through the configured observer. Instances are
/// independent; there is no process-wide state.
pub struct Synchronizer {
  pub(crate) source: Arc<dyn RemoteSource>,
  pub(crate) bin_dir: PathBuf,
  pub(crate) cache: Arc<DigestCache>,
  pub(crate) selection: ClientSelection,
  pub(crate) policy: ScanPolicy,
  pub(crate) observer: Arc<dyn SyncObserver>,
  pub(crate) cancel: CancelToken,
  pub(crate) in_progress: Arc<AtomicBool>,
}

impl Synchronizer {
  pub fn builder() -> SynchronizerBuilder {
    SynchronizerBuilder::new()
  }

  /// Handle a front-end can keep to cancel the run from another task.
  pub fn cancel_token(&self) -> CancelToken {
    self.cancel.clone()
  }

  /// Directory the dataset is synchronized into.
  pub fn bin_dir(&self) -> &PathBuf {
    &self.bin_dir
  }

  /// Runs the pipeline once. A second call while one is in flight fails
  /// with `AlreadyRunning`.
  pub async fn run(&self) -> Result<RunReport, Error> {
    if self.in_progress.swap(true, Ordering::SeqCst) {
      return Err(Error::AlreadyRunning());
    }
    let result = flow(FlowContext {
      source: Arc::clone(&self.source),
      bin_dir: self.bin_dir.clone(),
      cache: Arc::clone(&self.cache),
      selection: self.selection,
      policy: self.policy,
      observer: Arc::clone(&self.observer),
      cancel: self.cancel.clone(),
    })
    .await;
    self.in_progress.store(false, Ordering::SeqCst);
    result
  }
}
