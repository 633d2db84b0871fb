use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{info, warn};

use crate::cancellation::CancelToken;
use crate::functions::{fetch_manifest, run_worker, scan, WorkerContext, download_worker::CHUNK_SIZE};
use crate::implementations::scheduler::{LARGE_WORKERS, MEDIUM_WORKERS, SMALL_WORKERS};
use crate::structures::{
  BufferPool, ClientSelection, DigestCache, Error, HealthMonitor, Progress, ScanPolicy, Tier,
  TieredScheduler,
};
use crate::synchronizer::RunReport;
use crate::traits::{RemoteSource, SyncObserver};

/// Hard cap on what the advisory thread count may request.
const MAX_ADVISORY_THREADS: u32 = 16;

pub(crate) struct FlowContext {
  pub source: Arc<dyn RemoteSource>,
  pub bin_dir: PathBuf,
  pub cache: Arc<DigestCache>,
  pub selection: ClientSelection,
  pub policy: ScanPolicy,
  pub observer: Arc<dyn SyncObserver>,
  pub cancel: CancelToken,
}

/// The whole run: root -> manifest -> scan -> tiered download -> cache flush.
pub(crate) async fn flow(ctx: FlowContext) -> Result<RunReport, Error> {
  ctx.cache.load();

  let root = ctx.source.fetch_root().await?;
  let advisory = root.thread_num.max(root.parallel_thread_num);
  if advisory > 1 {
    // advisory only; the tier split stays fixed once downloading starts
    info!("Server advises {} download threads (capped at {})", advisory, advisory.min(MAX_ADVISORY_THREADS));
  }
  let max_retries = root.retry_num.max(1);
  let read_timeout = Duration::from_millis(root.timeout_ms.max(1));

  let manifest = fetch_manifest(&ctx.source, ctx.selection).await?;
  let download_set = scan(manifest, &ctx.bin_dir, ctx.policy, &ctx.cache, &ctx.observer).await;

  if download_set.is_empty() {
    info!("Everything is up to date");
    ctx.cache.flush();
    ctx.observer.on_download_completed(true, 0, 0, 0);
    return Ok(RunReport { succeeded: 0, failed: 0, cancelled: 0 });
  }

  let total = download_set.len() as u64;
  ctx.observer.on_download_started(total);

  let scheduler = Arc::new(TieredScheduler::new());
  scheduler.enqueue_all(download_set);

  let worker_ctx = Arc::new(WorkerContext {
    scheduler,
    source: Arc::clone(&ctx.source),
    cache: Arc::clone(&ctx.cache),
    health: Arc::new(HealthMonitor::new()),
    buffers: Arc::new(BufferPool::new(CHUNK_SIZE)),
    observer: Arc::clone(&ctx.observer),
    progress: Arc::new(Progress::new(total)),
    cancel: ctx.cancel.clone(),
    max_retries,
    read_timeout,
  });

  let mut workers = Vec::with_capacity(LARGE_WORKERS + MEDIUM_WORKERS + SMALL_WORKERS);
  let affinities = [
    (Tier::Large, LARGE_WORKERS),
    (Tier::Medium, MEDIUM_WORKERS),
    (Tier::Small, SMALL_WORKERS),
  ];
  let mut worker_id = 0;
  for (affinity, count) in affinities {
    for _ in 0..count {
      workers.push(tokio::task::spawn(run_worker(Arc::clone(&worker_ctx), worker_id, affinity)));
      worker_id += 1;
    }
  }
  for joined in join_all(workers).await {
    if let Err(e) = joined {
      warn!("A download worker panicked: {}", e);
    }
  }

  ctx.cache.flush();

  let (succeeded, failed, cancelled) = worker_ctx.progress.snapshot();
  let ok = failed == 0 && cancelled == 0;
  ctx.observer.on_download_completed(ok, succeeded, failed, cancelled);
  Ok(RunReport { succeeded, failed, cancelled })
}
