use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::structures::{CacheEntry, DigestCache};

impl DigestCache {
  pub fn new(path: PathBuf) -> Self {
    Self {
      path,
      entries: DashMap::new(),
      dirty: AtomicBool::new(false),
      flush_lock: parking_lot::Mutex::new(()),
    }
  }

  /// Reads the cache document. An absent file is not an error; a document
  /// that fails to parse is discarded and the cache starts empty.
  pub fn load(&self) {
    let text = match std::fs::read_to_string(&self.path) {
      Ok(text) => text,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
      Err(e) => {
        warn!("Could not read digest cache {}: {}", self.path.display(), e);
        return;
      },
    };
    match serde_json::from_str::<BTreeMap<String, CacheEntry>>(&text) {
      Ok(parsed) => {
        for (key, entry) in parsed {
          self.entries.insert(normalize_key(&key), entry);
        }
        debug!("Loaded {} digest cache entries", self.entries.len());
      },
      Err(e) => {
        warn!("Discarding unparseable digest cache {}: {}", self.path.display(), e);
      },
    }
  }

  pub fn lookup(&self, rel_path: &str) -> Option<CacheEntry> {
    self.entries.get(&normalize_key(rel_path)).map(|entry| entry.value().clone())
  }

  /// True iff a cache entry exists whose size and mtime both match exactly.
  pub fn is_fresh(&self, rel_path: &str, mtime: DateTime<Utc>, size: u64) -> bool {
    match self.lookup(rel_path) {
      Some(entry) => entry.size == size && entry.mtime == mtime,
      None => false,
    }
  }

  /// Inserts or overwrites; only called after a successful verification or
  /// a fresh local hash.
  pub fn record(&self, rel_path: &str, digest: &str, size: u64, mtime: DateTime<Utc>) {
    self.entries.insert(
      normalize_key(rel_path),
      CacheEntry {
        digest: digest.to_ascii_lowercase(),
        size,
        mtime,
      },
    );
    self.dirty.store(true, Ordering::Release);
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Writes a consistent snapshot to disk when dirty. Errors are logged,
  /// never propagated; losing the cache only costs a rehash.
  pub fn flush(&self) {
    if !self.dirty.swap(false, Ordering::AcqRel) {
      return;
    }
    let _guard = self.flush_lock.lock();
    let snapshot: BTreeMap<String, CacheEntry> = self
      .entries
      .iter()
      .map(|pair| (pair.key().clone(), pair.value().clone()))
      .collect();
    let text = match serde_json::to_string_pretty(&snapshot) {
      Ok(text) => text,
      Err(e) => {
        warn!("Could not serialize digest cache: {}", e);
        return;
      },
    };
    if let Some(parent) = self.path.parent() {
      if let Err(e) = std::fs::create_dir_all(parent) {
        warn!("Could not create cache directory {}: {}", parent.display(), e);
        return;
      }
    }
    if let Err(e) = std::fs::write(&self.path, text) {
      warn!("Could not write digest cache {}: {}", self.path.display(), e);
      // keep the dirty bit so a later flush can retry
      self.dirty.store(true, Ordering::Release);
    } else {
      debug!("Flushed {} digest cache entries", snapshot.len());
    }
  }
}

fn normalize_key(rel_path: &str) -> String {
  rel_path.replace('\\', "/").to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn mtime(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 500_000_000).unwrap()
  }

  #[test]
  fn lookup_is_case_insensitive() {
    let cache = DigestCache::new(PathBuf::from("unused.json"));
    cache.record("Data/Win32/File.ice", "ABCDEF", 10, mtime(1000));
    let entry = cache.lookup("data/win32/file.ice").unwrap();
    assert_eq!(entry.digest, "abcdef");
  }

  #[test]
  fn freshness_requires_exact_size_and_mtime() {
    let cache = DigestCache::new(PathBuf::from("unused.json"));
    cache.record("a.bin", "aa", 10, mtime(1000));
    assert!(cache.is_fresh("a.bin", mtime(1000), 10));
    assert!(!cache.is_fresh("a.bin", mtime(1001), 10));
    assert!(!cache.is_fresh("a.bin", mtime(1000), 11));
    assert!(!cache.is_fresh("b.bin", mtime(1000), 10));
  }

  #[test]
  fn flush_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sub").join("StarDriver.cache.json");

    let cache = DigestCache::new(path.clone());
    cache.record("a.bin", "aa", 10, mtime(1000));
    cache.record("b/c.bin", "bb", 20, mtime(2000));
    cache.flush();
    assert!(path.exists());

    let reloaded = DigestCache::new(path);
    reloaded.load();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.lookup("a.bin").unwrap(), cache.lookup("a.bin").unwrap());
    assert_eq!(reloaded.lookup("b/c.bin").unwrap(), cache.lookup("b/c.bin").unwrap());
  }

  #[test]
  fn flush_is_a_no_op_when_clean() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("StarDriver.cache.json");
    let cache = DigestCache::new(path.clone());
    cache.flush();
    assert!(!path.exists());
  }

  #[test]
  fn corrupt_documents_start_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("StarDriver.cache.json");
    std::fs::write(&path, "{not json").unwrap();
    let cache = DigestCache::new(path);
    cache.load();
    assert!(cache.is_empty());
  }
}
