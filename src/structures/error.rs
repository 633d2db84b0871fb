#[derive(Debug)]
pub enum Error {
  /// The management document is missing PatchURL or MasterURL
  ManifestParse(String),
  /// HTTP 403 on a manifest endpoint; access from this region is likely restricted
  Forbidden(String),
  /// Non-2xx status; first field is the code, second the URL
  UnexpectedStatus(u16, String),
  InvalidUrl(url::ParseError),
  HttpError(reqwest::Error),
  DownloadTimeout(tokio::time::error::Elapsed),

  /// Computed digest did not match; fields are path, computed, expected
  HashMismatch(String, String, String),
  IoError(std::io::Error),
  JsonError(serde_json::Error),

  OutOfRetries(&'static str),
  AlreadyRunning(),
  Cancelled(),
  None(String),
}

/// Classification of an error for retry policy and health accounting.
/// This is a pure function of the error; the backoff table lives on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
  ClientStatus4xx,
  Forbidden,
  ServerStatus5xx,
  ConnectionReset,
  OtherSocket,
  Timeout,
  IoError,
  DigestMismatch,
  Unhandled(String),
  Cancelled,
}
