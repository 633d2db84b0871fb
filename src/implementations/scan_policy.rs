use crate::structures::ScanPolicy;

impl Default for ScanPolicy {
  /// Compare size and digest; everything else off.
  fn default() -> Self {
    Self {
      missing_only: false,
      compare_size: true,
      compare_digest: true,
      force_rehash: false,
      trust_cache: false,
    }
  }
}

impl ScanPolicy {
  /// Only download files that are absent on disk.
  pub fn missing_only() -> Self {
    Self {
      missing_only: true,
      compare_size: false,
      compare_digest: false,
      force_rehash: false,
      trust_cache: false,
    }
  }

  /// Full verification that ignores the digest cache.
  pub fn full_rehash() -> Self {
    Self {
      force_rehash: true,
      ..Self::default()
    }
  }

  /// Trust cache entries whose size and mtime still match.
  pub fn trust_cache() -> Self {
    Self {
      trust_cache: true,
      ..Self::default()
    }
  }
}
