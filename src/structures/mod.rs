mod manifest_entry;
pub use manifest_entry::Channel as Channel;
pub use manifest_entry::ManifestEntry as ManifestEntry;

mod root_descriptor;
pub use root_descriptor::RootDescriptor as RootDescriptor;

mod client_selection;
pub use client_selection::ClientSelection as ClientSelection;

mod scan_policy;
pub use scan_policy::ScanPolicy as ScanPolicy;

mod download_task;
pub use download_task::DownloadTask as DownloadTask;
pub use download_task::TaskStatus as TaskStatus;

mod cache_entry;
pub use cache_entry::CacheEntry as CacheEntry;

mod digest_cache;
pub use digest_cache::DigestCache as DigestCache;

mod health_monitor;
pub use health_monitor::HealthMonitor as HealthMonitor;

mod scheduler;
pub use scheduler::Tier as Tier;
pub use scheduler::TieredScheduler as TieredScheduler;

mod buffer_pool;
pub use buffer_pool::BufferPool as BufferPool;

mod manifest_client;
pub use manifest_client::ManifestClient as ManifestClient;

mod response;
pub use response::Response as Response;

mod progress;
pub use progress::Progress as Progress;

mod error;
pub use error::Error as Error;
pub use error::ErrorKind as ErrorKind;
