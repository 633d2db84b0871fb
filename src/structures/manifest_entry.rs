/// The base-URL family an entry must be fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
  /// Fetched from the patch base URL
  Patch,
  /// Fetched from the master base URL
  Master,
  /// Three-field manifest rows carry no channel column; treated as patch
  Unknown,
}

/// One row of a manifest sub-list.
#[derive(Debug, Clone)]
pub struct ManifestEntry {
  /// Name exactly as listed, including the `.pat` suffix
  pub name: String,
  /// Relative path on disk, suffix stripped, backslashes normalized
  pub rel_path: String,
  /// Expected size in bytes
  pub size: u64,
  /// Expected MD5, lowercase hex
  pub md5: String,
  /// Which base URL family serves this entry
  pub channel: Channel,
  /// Whether the entry came from the reboot sub-list
  pub reboot: bool,
}
