use parking_lot::RwLock;

use crate::structures::RootDescriptor;

/// HTTPS retriever for the management document, the manifest sub-lists and
/// individual file streams. One shared keep-alive connection pool serves all
/// workers.
pub struct ManifestClient {
  pub(crate) http: reqwest::Client,
  pub(crate) management_url: String,
  pub(crate) root: RwLock<Option<RootDescriptor>>,
}
