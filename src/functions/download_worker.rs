use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use md5::{Digest, Md5};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, warn};

use crate::cancellation::CancelToken;
use crate::structures::{
  BufferPool, DigestCache, DownloadTask, Error, ErrorKind, HealthMonitor, Progress, TaskStatus,
  Tier, TieredScheduler,
};
use crate::traits::{RemoteSource, SyncObserver};

/// Transfer chunk size. Rented buffers are exactly one chunk.
pub(crate) const CHUNK_SIZE: usize = 64 * 1024;
/// Progress events are rate limited to one per this many bytes or per
/// second, whichever comes first.
const PROGRESS_BYTES: u64 = 256 * 1024;
const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Everything a download worker shares with its siblings.
pub(crate) struct WorkerContext {
  pub scheduler: Arc<TieredScheduler>,
  pub source: Arc<dyn RemoteSource>,
  pub cache: Arc<DigestCache>,
  pub health: Arc<HealthMonitor>,
  pub buffers: Arc<BufferPool>,
  pub observer: Arc<dyn SyncObserver>,
  pub progress: Arc<Progress>,
  pub cancel: CancelToken,
  /// Retry budget per task, from the management document
  pub max_retries: u32,
  /// Per-read timeout, from the management document
  pub read_timeout: Duration,
}

/// One worker: drains its affinity tier, steals when it runs dry, and
/// terminates when all three queues are empty.
pub(crate) async fn run_worker(ctx: Arc<WorkerContext>, worker_id: usize, affinity: Tier) {
  while let Some(mut task) = ctx.scheduler.acquire(affinity) {
    if ctx.cancel.is_cancelled() {
      task.status = TaskStatus::Cancelled;
      ctx.progress.note_cancelled();
      continue;
    }
    let task = run_task(&ctx, worker_id, task).await;
    match task.status {
      TaskStatus::Completed => ctx.progress.note_completed(),
      TaskStatus::Cancelled => ctx.progress.note_cancelled(),
      _ => ctx.progress.note_failed(),
    }
    ctx.health.maybe_recommend_reset();
  }
  debug!("Worker {} out of work, terminating", worker_id);
}

/// The per-file pipeline: stream, hash while writing, verify, install
/// atomically, record in the cache. Retries with classified backoff until
/// the budget is spent.
async fn run_task(ctx: &Arc<WorkerContext>, worker_id: usize, mut task: DownloadTask) -> DownloadTask {
  task.status = TaskStatus::Downloading;
  let temp = task.temp_path();
  if let Some(parent) = task.destination.parent() {
    if let Err(e) = tokio::fs::create_dir_all(parent).await {
      warn!("Could not create {}: {}", parent.display(), e);
    }
  }

  for attempt in 0..ctx.max_retries.max(1) {
    task.retry_count = attempt;
    if ctx.cancel.is_cancelled() {
      task.status = TaskStatus::Cancelled;
      return task;
    }
    // after half the budget, fall over to the backup base when one exists
    let use_backup = attempt >= ctx.max_retries.max(1).div_ceil(2);
    match attempt_download(ctx, worker_id, &mut task, &temp, use_backup).await {
      Ok(()) => {
        task.status = TaskStatus::Completed;
        ctx.health.notify_success();
        ctx.observer.on_file_verified(worker_id, &task, true);
        return task;
      },
      Err(e) => {
        let kind = ErrorKind::classify(&e);
        if kind == ErrorKind::Cancelled {
          task.status = TaskStatus::Cancelled;
          return task;
        }
        task.last_error = Some(e.to_string());
        ctx.health.notify_error(kind.clone());
        warn!(
          "[{:02}] Attempt {} for {} failed ({}): {}",
          worker_id, attempt, task.entry.rel_path, kind.label(), e
        );
        if kind == ErrorKind::DigestMismatch {
          let _ = tokio::fs::remove_file(&temp).await;
        }
        match kind.backoff() {
          Some(delay) if attempt + 1 < ctx.max_retries.max(1) => tokio::time::sleep(delay).await,
          Some(_) => {},
          None => break,
        }
      },
    }
  }

  task.status = TaskStatus::Failed;
  let detail = task.last_error.take().unwrap_or_else(|| "no attempt ran".to_string());
  task.last_error = Some(format!(
    "exceeded max retries ({}); last error: {}",
    ctx.max_retries.max(1),
    detail
  ));
  let _ = tokio::fs::remove_file(&temp).await;
  ctx.observer.on_file_verified(worker_id, &task, false);
  task
}

async fn attempt_download(
  ctx: &Arc<WorkerContext>,
  worker_id: usize,
  task: &mut DownloadTask,
  temp: &Path,
  use_backup: bool,
) -> Result<(), Error> {
  task.status = TaskStatus::Downloading;
  task.bytes_downloaded = 0;

  let response = ctx.source.open_stream(&task.entry, use_backup).await?;
  if !(200..300).contains(&response.status) {
    return Err(Error::UnexpectedStatus(response.status, task.entry.name.clone()));
  }
  let expected_len = response.content_length.unwrap_or(task.entry.size);

  let mut file = tokio::fs::OpenOptions::new()
    .write(true)
    .create(true)
    .truncate(true)
    .open(temp)
    .await?;
  if expected_len > 0 {
    // preallocate to keep large files from fragmenting
    file.set_len(expected_len).await?;
  }

  let mut body = response.body;
  let mut hasher = Md5::new();
  let mut buffer = ctx.buffers.rent();
  let streamed = stream_to_disk(
    ctx, worker_id, task, &mut body, &mut file, &mut hasher, &mut buffer, expected_len,
  )
  .await;
  ctx.buffers.give_back(buffer);
  streamed?;

  if task.bytes_downloaded < expected_len {
    // the preallocation overshot; trim the zero tail
    file.set_len(task.bytes_downloaded).await?;
  }
  file.flush().await?;
  file.sync_all().await?;
  drop(file);

  task.status = TaskStatus::Verifying;
  let digest = hex::encode(hasher.finalize());
  if !digest.eq_ignore_ascii_case(&task.entry.md5) {
    return Err(Error::HashMismatch(task.entry.rel_path.clone(), digest, task.entry.md5.clone()));
  }

  install(temp, &task.destination).await?;

  let metadata = tokio::fs::metadata(&task.destination).await?;
  let mtime = metadata.modified()?.into();
  ctx.cache.record(&task.entry.rel_path, &digest, metadata.len(), mtime);
  Ok(())
}

/// Pumps the body to disk one chunk at a time: each chunk is fed to the
/// hash, then written out. The write of chunk N completes before chunk N+1
/// is read into the same buffer, so the digest always covers exactly what
/// reached the file.
async fn stream_to_disk(
  ctx: &Arc<WorkerContext>,
  worker_id: usize,
  task: &mut DownloadTask,
  body: &mut Box<dyn tokio::io::AsyncRead + Send + Unpin>,
  file: &mut tokio::fs::File,
  hasher: &mut Md5,
  buffer: &mut [u8],
  expected_len: u64,
) -> Result<(), Error> {
  let mut last_emit = Instant::now();
  let mut last_emit_bytes = 0u64;
  loop {
    if ctx.cancel.is_cancelled() {
      return Err(Error::Cancelled());
    }
    let read = tokio::time::timeout(ctx.read_timeout, body.read(buffer)).await??;
    if read == 0 {
      break;
    }
    hasher.update(&buffer[..read]);
    file.write_all(&buffer[..read]).await?;
    task.bytes_downloaded += read as u64;

    if task.bytes_downloaded - last_emit_bytes >= PROGRESS_BYTES
      || last_emit.elapsed() >= PROGRESS_INTERVAL
    {
      ctx.observer.on_download_progress(worker_id, task, task.bytes_downloaded, expected_len);
      last_emit = Instant::now();
      last_emit_bytes = task.bytes_downloaded;
    }
  }
  ctx.observer.on_download_progress(worker_id, task, task.bytes_downloaded, expected_len);
  Ok(())
}

/// Atomic install: the verified temporary replaces the destination. A
/// read-only destination is made writable first; the rename either lands
/// whole or not at all.
async fn install(temp: &Path, destination: &Path) -> Result<(), Error> {
  if let Ok(metadata) = tokio::fs::metadata(destination).await {
    let mut permissions = metadata.permissions();
    if permissions.readonly() {
      permissions.set_readonly(false);
      tokio::fs::set_permissions(destination, permissions).await?;
    }
  }
  match tokio::fs::rename(temp, destination).await {
    Ok(()) => Ok(()),
    Err(_) => {
      // rename-over fails on some platforms when the destination exists
      let _ = tokio::fs::remove_file(destination).await;
      tokio::fs::rename(temp, destination).await?;
      Ok(())
    },
  }
}
