use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use futures::StreamExt;
use tracing::{debug, warn};

use crate::functions::get_hash;
use crate::structures::{DigestCache, DownloadTask, ManifestEntry, ScanPolicy};
use crate::traits::SyncObserver;

/// Progress is emitted every this many checked entries, and once at the end.
const PROGRESS_EVERY: u64 = 100;

/// Walks the manifest in parallel (ceiling of `cpu_count x 2`) and emits the
/// set of entries that need downloading. Order of the result is unspecified.
pub(crate) async fn scan(
  manifest: Vec<ManifestEntry>,
  bin_dir: &Path,
  policy: ScanPolicy,
  cache: &Arc<DigestCache>,
  observer: &Arc<dyn SyncObserver>,
) -> Vec<DownloadTask> {
  let total = manifest.len() as u64;
  let scanned = AtomicU64::new(0);
  let concurrency = num_cpus::get() * 2;

  let tasks: Vec<DownloadTask> = futures::stream::iter(manifest)
    .map(|entry| {
      let scanned = &scanned;
      let cache = Arc::clone(cache);
      let observer = Arc::clone(observer);
      async move {
        let destination = bin_dir.join(&entry.rel_path);
        let wanted = check_entry(&entry, &destination, policy, &cache).await;
        let done = scanned.fetch_add(1, Ordering::Relaxed) + 1;
        if done % PROGRESS_EVERY == 0 {
          observer.on_scan_progress(done, total);
        }
        wanted.then(|| DownloadTask::new(entry, destination))
      }
    })
    .buffer_unordered(concurrency)
    .filter_map(|maybe| async move { maybe })
    .collect()
    .await;

  observer.on_scan_progress(total, total);
  debug!("Scan produced {} download tasks out of {} entries", tasks.len(), total);
  tasks
}

/// Decides whether one entry needs downloading.
async fn check_entry(
  entry: &ManifestEntry,
  destination: &Path,
  policy: ScanPolicy,
  cache: &Arc<DigestCache>,
) -> bool {
  let metadata = match tokio::fs::metadata(destination).await {
    Ok(metadata) => metadata,
    Err(_) => return true,
  };
  if policy.missing_only {
    return false;
  }

  let size = metadata.len();
  let mtime: Option<DateTime<Utc>> = metadata.modified().ok().map(DateTime::<Utc>::from);

  if policy.trust_cache {
    if let Some(mtime) = mtime {
      if cache.is_fresh(&entry.rel_path, mtime, size) {
        return false;
      }
    }
  }

  if policy.compare_size && size != entry.size {
    return true;
  }

  if policy.compare_digest {
    let digest = local_digest(entry, destination, policy, cache, size, mtime).await;
    return match digest {
      Ok(digest) => !digest.eq_ignore_ascii_case(&entry.md5),
      Err(e) => {
        // an unreadable file is treated as wrong and re-downloaded
        warn!("Hashing {} failed: {}", destination.display(), e);
        true
      },
    };
  }

  false
}

/// The local file's digest: a fresh cache entry supplies it without reading
/// the file unless a full rehash was requested.
async fn local_digest(
  entry: &ManifestEntry,
  destination: &Path,
  policy: ScanPolicy,
  cache: &Arc<DigestCache>,
  size: u64,
  mtime: Option<DateTime<Utc>>,
) -> Result<String, crate::structures::Error> {
  if !policy.force_rehash {
    if let Some(mtime) = mtime {
      if cache.is_fresh(&entry.rel_path, mtime, size) {
        if let Some(cached) = cache.lookup(&entry.rel_path) {
          return Ok(cached.digest);
        }
      }
    }
  }
  let digest = get_hash(destination).await?;
  if let Some(mtime) = mtime {
    cache.record(&entry.rel_path, &digest, size, mtime);
  }
  Ok(digest)
}
