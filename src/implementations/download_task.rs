use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::structures::{DownloadTask, ManifestEntry, TaskStatus};

impl DownloadTask {
  pub fn new(entry: ManifestEntry, destination: PathBuf) -> Self {
    Self {
      entry,
      destination,
      status: TaskStatus::Pending,
      bytes_downloaded: 0,
      retry_count: 0,
      last_error: None,
    }
  }

  /// Path the stream is written to before verification: `<dest>.dtmp`.
  pub fn temp_path(&self) -> PathBuf {
    let mut os: OsString = self.destination.as_os_str().to_os_string();
    os.push(".dtmp");
    PathBuf::from(os)
  }

  pub fn destination(&self) -> &Path {
    &self.destination
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn temp_path_appends_the_dtmp_extension() {
    let entry = ManifestEntry::parse_line("data/win32/a.ice.pat\t10\taa", false).unwrap();
    let task = DownloadTask::new(entry, PathBuf::from("/root/pso2_bin/data/win32/a.ice"));
    assert_eq!(task.temp_path(), PathBuf::from("/root/pso2_bin/data/win32/a.ice.dtmp"));
    assert_eq!(task.status, TaskStatus::Pending);
  }
}
