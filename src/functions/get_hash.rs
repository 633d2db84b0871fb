use std::path::Path;

use md5::{Digest, Md5};
use tokio::io::AsyncReadExt;

use crate::structures::Error;

/// Read chunk used when hashing local files during a scan.
const HASH_CHUNK: usize = 80 * 1024;

/// Opens a file and calculates its MD5, lowercase hex.
pub(crate) async fn get_hash(file_path: &Path) -> Result<String, Error> {
  let mut file = tokio::fs::File::open(file_path).await?;
  let mut hasher = Md5::new();
  let mut buffer = vec![0u8; HASH_CHUNK];
  loop {
    let read = file.read(&mut buffer).await?;
    if read == 0 {
      break;
    }
    hasher.update(&buffer[..read]);
  }
  Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn hashes_known_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("abcd.bin");
    std::fs::write(&path, b"abcd").unwrap();
    assert_eq!(get_hash(&path).await.unwrap(), "e2fc714c4727ee9395f324cd2e7f331f");
  }

  #[tokio::test]
  async fn hashes_the_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.bin");
    std::fs::write(&path, b"").unwrap();
    assert_eq!(get_hash(&path).await.unwrap(), "d41d8cd98f00b204e9800998ecf8427e");
  }

  #[tokio::test]
  async fn missing_files_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = get_hash(&dir.path().join("nope.bin")).await;
    assert!(matches!(result, Err(Error::IoError(_))));
  }
}
