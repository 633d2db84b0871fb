use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use dashmap::DashMap;

use crate::structures::CacheEntry;

/// Persistent mapping from relative path to digest, size and mtime.
/// Speeds up rescans by letting unchanged files skip rehashing; loss of the
/// backing document is tolerated.
pub struct DigestCache {
  pub(crate) path: PathBuf,
  pub(crate) entries: DashMap<String, CacheEntry>,
  pub(crate) dirty: AtomicBool,
  pub(crate) flush_lock: parking_lot::Mutex<()>,
}
