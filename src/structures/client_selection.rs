/// Which manifest sub-lists make up the dataset to synchronize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientSelection {
  /// Prologue, reboot and launcher lists
  FullDataset,
  /// Reboot and launcher lists
  MainOnly,
  /// Launcher list only
  LauncherOnly,
}
