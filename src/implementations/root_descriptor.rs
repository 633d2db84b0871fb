use crate::structures::{Channel, Error, RootDescriptor};

impl RootDescriptor {
  /// Parses the `key=value` management document. Unknown keys are ignored;
  /// missing numeric fields take the documented defaults. Fails only when
  /// PatchURL or MasterURL is absent.
  pub fn parse(text: &str) -> Result<RootDescriptor, Error> {
    let mut patch_url = None;
    let mut master_url = None;
    let mut backup_patch_url = None;
    let mut backup_master_url = None;
    let mut thread_num = 1u32;
    let mut parallel_thread_num = 1u32;
    let mut retry_num = 10u32;
    let mut timeout_ms = 30_000u64;

    for line in text.lines() {
      let line = line.trim();
      let Some((key, value)) = line.split_once('=') else { continue };
      let value = value.trim();
      match key.trim() {
        "PatchURL" => patch_url = Some(value.to_string()),
        "MasterURL" => master_url = Some(value.to_string()),
        "BackupPatchURL" => backup_patch_url = Some(value.to_string()),
        "BackupMasterURL" => backup_master_url = Some(value.to_string()),
        "ThreadNum" => thread_num = value.parse().unwrap_or(thread_num),
        "ParallelThreadNum" => parallel_thread_num = value.parse().unwrap_or(parallel_thread_num),
        "RetryNum" => retry_num = value.parse().unwrap_or(retry_num),
        "TimeOut" => timeout_ms = value.parse().unwrap_or(timeout_ms),
        _ => {},
      }
    }

    let patch_url = patch_url
      .ok_or_else(|| Error::ManifestParse("PatchURL is missing".to_string()))?;
    let master_url = master_url
      .ok_or_else(|| Error::ManifestParse("MasterURL is missing".to_string()))?;

    Ok(RootDescriptor {
      patch_url,
      master_url,
      backup_patch_url,
      backup_master_url,
      thread_num,
      parallel_thread_num,
      retry_num,
      timeout_ms,
    })
  }

  /// Base URL for an entry, chosen by channel and whether the backup base is
  /// wanted. A missing backup falls back to the primary.
  pub fn base_for(&self, channel: Channel, use_backup: bool) -> &str {
    match (channel, use_backup) {
      (Channel::Master, false) => &self.master_url,
      (Channel::Master, true) => self.backup_master_url.as_deref().unwrap_or(&self.master_url),
      (_, false) => &self.patch_url,
      (_, true) => self.backup_patch_url.as_deref().unwrap_or(&self.patch_url),
    }
  }
}
