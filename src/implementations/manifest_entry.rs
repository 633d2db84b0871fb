use tracing::warn;

use crate::structures::{Channel, ManifestEntry};

/// Suffix every listed name carries; stripped to form the on-disk path.
const PATCH_SUFFIX: &str = ".pat";

impl ManifestEntry {
  /// Parses one TAB-separated manifest row. Three-field rows are
  /// `<name>\t<size>\t<md5>` with the channel unknown; four-field rows are
  /// `<name>\t<md5>\t<size>\t<channel-char>` where `'p'` means patch.
  /// Returns `None` for rows that do not parse; the caller skips them.
  pub fn parse_line(line: &str, reboot: bool) -> Option<ManifestEntry> {
    let fields: Vec<&str> = line.split('\t').collect();
    let (name, size, md5, channel) = match fields.as_slice() {
      [name, size, md5] => (*name, size.parse::<u64>().ok()?, *md5, Channel::Unknown),
      [name, md5, size, channel] => {
        let channel = if *channel == "p" { Channel::Patch } else { Channel::Master };
        (*name, size.parse::<u64>().ok()?, *md5, channel)
      },
      _ => {
        warn!("Skipping manifest row with {} fields: {:?}", fields.len(), line);
        return None;
      },
    };
    if name.is_empty() || md5.is_empty() {
      warn!("Skipping manifest row with empty name or digest: {:?}", line);
      return None;
    }
    Some(ManifestEntry {
      name: name.to_string(),
      rel_path: normalize(name),
      size,
      md5: md5.to_ascii_lowercase(),
      channel,
      reboot,
    })
  }

  /// De-duplication key: the normalized relative path, lowercased.
  pub fn key(&self) -> String {
    self.rel_path.to_ascii_lowercase()
  }
}

fn normalize(name: &str) -> String {
  let name = name.replace('\\', "/");
  match name.strip_suffix(PATCH_SUFFIX) {
    Some(stripped) => stripped.to_string(),
    None => name,
  }
}

/// Two entries are the same file iff their normalized relative paths match
/// case-insensitively.
impl PartialEq for ManifestEntry {
  fn eq(&self, other: &Self) -> bool {
    self.rel_path.eq_ignore_ascii_case(&other.rel_path)
  }
}

impl Eq for ManifestEntry { }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn three_field_rows_have_unknown_channel() {
    let entry = ManifestEntry::parse_line("data/win32/abc.ice.pat\t1048576\t0123456789ABCDEF0123456789ABCDEF", false).unwrap();
    assert_eq!(entry.name, "data/win32/abc.ice.pat");
    assert_eq!(entry.rel_path, "data/win32/abc.ice");
    assert_eq!(entry.size, 1_048_576);
    assert_eq!(entry.md5, "0123456789abcdef0123456789abcdef");
    assert_eq!(entry.channel, Channel::Unknown);
  }

  #[test]
  fn four_field_rows_carry_the_channel() {
    let entry = ManifestEntry::parse_line("pso2.exe.pat\tdeadbeefdeadbeefdeadbeefdeadbeef\t4242\tp", true).unwrap();
    assert_eq!(entry.size, 4242);
    assert_eq!(entry.channel, Channel::Patch);
    assert!(entry.reboot);

    let entry = ManifestEntry::parse_line("pso2.exe.pat\tdeadbeefdeadbeefdeadbeefdeadbeef\t4242\tm", false).unwrap();
    assert_eq!(entry.channel, Channel::Master);
  }

  #[test]
  fn garbage_rows_are_skipped() {
    assert!(ManifestEntry::parse_line("", false).is_none());
    assert!(ManifestEntry::parse_line("only_a_name.pat", false).is_none());
    assert!(ManifestEntry::parse_line("a.pat\tnot_a_number\tdeadbeef", false).is_none());
    assert!(ManifestEntry::parse_line("a\tb\tc\td\te", false).is_none());
  }

  #[test]
  fn equality_ignores_case_and_suffix() {
    let a = ManifestEntry::parse_line("Data/Win32/File.ice.pat\t10\taa", false).unwrap();
    let b = ManifestEntry::parse_line("data/win32/file.ice.pat\t20\tbb", true).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.key(), b.key());
  }

  #[test]
  fn backslashes_are_normalized() {
    let entry = ManifestEntry::parse_line("data\\win32\\file.ice.pat\t10\taa", false).unwrap();
    assert_eq!(entry.rel_path, "data/win32/file.ice");
  }
}
