/// The parsed management document (`management_beta.txt`).
#[derive(Debug, Clone)]
pub struct RootDescriptor {
  pub patch_url: String,
  pub master_url: String,
  pub backup_patch_url: Option<String>,
  pub backup_master_url: Option<String>,
  /// Advisory download thread count
  pub thread_num: u32,
  /// Advisory parallel thread count
  pub parallel_thread_num: u32,
  /// Advisory retry budget per file
  pub retry_num: u32,
  /// Advisory request timeout in milliseconds
  pub timeout_ms: u64,
}
