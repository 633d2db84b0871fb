use async_trait::async_trait;

use crate::structures::{Error, ManifestEntry, Response, RootDescriptor};

/// The remote side of the pipeline: the management document, the manifest
/// sub-lists and per-file byte streams. The download workers only ever talk
/// to this trait, so tests can inject an in-memory fake.
#[async_trait]
pub trait RemoteSource: Send + Sync {
  /// Fetches and parses the management document. Implementations remember
  /// the descriptor for later base-URL selection.
  async fn fetch_root(&self) -> Result<RootDescriptor, Error>;

  /// Fetches one manifest sub-list. Rows that do not parse are skipped, not
  /// fatal; a Forbidden response is surfaced verbatim.
  async fn fetch_list(&self, name: &str, reboot: bool) -> Result<Vec<ManifestEntry>, Error>;

  /// Opens a range-less GET for one entry, choosing the base URL from the
  /// entry's channel and `use_backup`.
  async fn open_stream(&self, entry: &ManifestEntry, use_backup: bool) -> Result<Response, Error>;
}
