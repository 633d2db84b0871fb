use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted digest record for one relative path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
  /// MD5, lowercase hex
  pub digest: String,
  pub size: u64,
  /// Last-modified timestamp of the file when the digest was taken
  pub mtime: DateTime<Utc>,
}
