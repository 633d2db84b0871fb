use std::collections::HashMap;

use crate::structures::{ClientSelection, ManifestEntry};

pub(crate) const PROLOGUE_LIST: &str = "patchlist_prologue.txt";
pub(crate) const REBOOT_LIST: &str = "patchlist_reboot.txt";
pub(crate) const LAUNCHER_LIST: &str = "launcherlist.txt";

/// One sub-list to fetch: (name, carries-the-reboot-tag, only-adds-new-keys).
pub(crate) type SubList = (&'static str, bool, bool);

impl ClientSelection {
  /// Sub-lists in precedence order. Reboot overrides prologue; the launcher
  /// list only contributes entries no prior list provided.
  pub(crate) fn sub_lists(&self) -> &'static [SubList] {
    match self {
      Self::FullDataset => &[
        (PROLOGUE_LIST, false, false),
        (REBOOT_LIST, true, false),
        (LAUNCHER_LIST, false, true),
      ],
      Self::MainOnly => &[
        (REBOOT_LIST, true, false),
        (LAUNCHER_LIST, false, true),
      ],
      Self::LauncherOnly => &[
        (LAUNCHER_LIST, false, true),
      ],
    }
  }
}

/// Unions fetched sub-lists into the final dataset, de-duplicating on the
/// suffix-stripped relative path. Order of the result is unspecified.
pub(crate) fn merge_lists(lists: Vec<(Vec<ManifestEntry>, bool)>) -> Vec<ManifestEntry> {
  let mut union: HashMap<String, ManifestEntry> = HashMap::new();
  for (entries, additive) in lists {
    for entry in entries {
      let key = entry.key();
      if additive {
        union.entry(key).or_insert(entry);
      } else {
        union.insert(key, entry);
      }
    }
  }
  union.into_values().collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(name: &str, md5: &str, reboot: bool) -> ManifestEntry {
    ManifestEntry::parse_line(&format!("{}\t100\t{}", name, md5), reboot).unwrap()
  }

  #[test]
  fn reboot_overrides_prologue() {
    let prologue = vec![entry("a.bin.pat", "aaaa", false), entry("b.bin.pat", "bbbb", false)];
    let reboot = vec![entry("A.bin.pat", "cccc", true)];
    let merged = merge_lists(vec![(prologue, false), (reboot, false)]);
    assert_eq!(merged.len(), 2);
    let a = merged.iter().find(|e| e.key() == "a.bin").unwrap();
    assert_eq!(a.md5, "cccc");
    assert!(a.reboot);
  }

  #[test]
  fn launcher_only_adds_missing_keys() {
    let reboot = vec![entry("a.bin.pat", "aaaa", true)];
    let launcher = vec![entry("a.bin.pat", "ffff", false), entry("launcher.exe.pat", "eeee", false)];
    let merged = merge_lists(vec![(reboot, false), (launcher, true)]);
    assert_eq!(merged.len(), 2);
    let a = merged.iter().find(|e| e.key() == "a.bin").unwrap();
    assert_eq!(a.md5, "aaaa");
    assert!(merged.iter().any(|e| e.key() == "launcher.exe"));
  }

  #[test]
  fn selections_pick_the_documented_lists() {
    let names: Vec<&str> = ClientSelection::FullDataset.sub_lists().iter().map(|l| l.0).collect();
    assert_eq!(names, vec![PROLOGUE_LIST, REBOOT_LIST, LAUNCHER_LIST]);
    let names: Vec<&str> = ClientSelection::MainOnly.sub_lists().iter().map(|l| l.0).collect();
    assert_eq!(names, vec![REBOOT_LIST, LAUNCHER_LIST]);
    let names: Vec<&str> = ClientSelection::LauncherOnly.sub_lists().iter().map(|l| l.0).collect();
    assert_eq!(names, vec![LAUNCHER_LIST]);
  }
}
