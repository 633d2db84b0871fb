//! Content-addressed bulk synchronizer for the PSO2 game client.
//!
//! Given the remote management document and its manifest sub-lists, a
//! [`Synchronizer`] brings a local `pso2_bin` tree into bit-exact agreement
//! with the manifest: it scans present files (accelerated by a persistent
//! digest cache), downloads what is missing or mismatched through a tiered
//! work-stealing worker pool, verifies every byte stream against its MD5,
//! and installs verified files atomically.

mod cancellation;
mod functions;
mod implementations;
mod structures;
mod synchronizer;
mod synchronizer_builder;
pub mod traits;

pub use cancellation::CancelToken;
pub use structures::{
  CacheEntry, Channel, ClientSelection, DigestCache, DownloadTask, Error, ErrorKind,
  HealthMonitor, ManifestClient, ManifestEntry, Response, RootDescriptor, ScanPolicy, TaskStatus,
  Tier, TieredScheduler,
};
pub use synchronizer::{RunReport, Synchronizer};
pub use synchronizer_builder::SynchronizerBuilder;
