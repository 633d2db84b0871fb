use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::cancellation::CancelToken;
use crate::structures::{ClientSelection, DigestCache, Error, ManifestClient, ScanPolicy};
use crate::synchronizer::Synchronizer;
use crate::traits::{NullObserver, RemoteSource, SyncObserver};

/// Directory layout under the install root.
const CLIENT_DIR: &str = "PHANTASYSTARONLINE2_JP";
const BIN_DIR: &str = "pso2_bin";
/// The digest cache document, kept next to the synchronized files.
const CACHE_FILE: &str = "StarDriver.cache.json";

pub struct SynchronizerBuilder {
  install_root: Option<PathBuf>,
  management_url: Option<String>,
  selection: ClientSelection,
  policy: ScanPolicy,
  observer: Option<Arc<dyn SyncObserver>>,
  source: Option<Arc<dyn RemoteSource>>,
  cancel: Option<CancelToken>,
}

impl SynchronizerBuilder {
  pub fn new() -> Self {
    Self {
      install_root: None,
      management_url: None,
      selection: ClientSelection::FullDataset,
      policy: ScanPolicy::default(),
      observer: None,
      source: None,
      cancel: None,
    }
  }

  pub fn install_root(mut self, install_root: impl Into<PathBuf>) -> Self {
    self.install_root = Some(install_root.into());
    self
  }

  pub fn management_url(mut self, management_url: impl Into<String>) -> Self {
    self.management_url = Some(management_url.into());
    self
  }

  pub fn selection(mut self, selection: ClientSelection) -> Self {
    self.selection = selection;
    self
  }

  pub fn policy(mut self, policy: ScanPolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn observer(mut self, observer: Arc<dyn SyncObserver>) -> Self {
    self.observer = Some(observer);
    self
  }

  /// Replaces the HTTP client with another remote source; tests inject an
  /// in-memory fake here.
  pub fn source(mut self, source: Arc<dyn RemoteSource>) -> Self {
    self.source = Some(source);
    self
  }

  /// Links the run to an externally owned cancellation token.
  pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
    self.cancel = Some(cancel);
    self
  }

  pub fn build(self) -> Result<Synchronizer, Error> {
    let install_root = self
      .install_root
      .ok_or_else(|| Error::None("install_root was not set".to_string()))?;
    let source: Arc<dyn RemoteSource> = match self.source {
      Some(source) => source,
      None => {
        let management_url = self
          .management_url
          .ok_or_else(|| Error::None("management_url was not set".to_string()))?;
        url::Url::parse(&management_url)?;
        Arc::new(ManifestClient::new(management_url)?)
      },
    };
    let bin_dir = install_root.join(CLIENT_DIR).join(BIN_DIR);
    let cache = Arc::new(DigestCache::new(bin_dir.join(CACHE_FILE)));
    Ok(Synchronizer {
      source,
      bin_dir,
      cache,
      selection: self.selection,
      policy: self.policy,
      observer: self.observer.unwrap_or_else(|| Arc::new(NullObserver)),
      cancel: self.cancel.unwrap_or_default(),
      in_progress: Arc::new(AtomicBool::new(false)),
    })
  }
}

impl Default for SynchronizerBuilder {
  fn default() -> Self {
    Self::new()
  }
}
