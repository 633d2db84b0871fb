/// Independent flags that decide how hard the scanner looks at present files.
#[derive(Debug, Clone, Copy)]
pub struct ScanPolicy {
  /// Only enqueue files that are absent on disk
  pub missing_only: bool,
  /// Enqueue when the on-disk size differs from the manifest
  pub compare_size: bool,
  /// Enqueue when the on-disk MD5 differs from the manifest
  pub compare_digest: bool,
  /// Ignore the digest cache and re-read every file
  pub force_rehash: bool,
  /// Skip any file whose cache entry matches size and mtime
  pub trust_cache: bool,
}
