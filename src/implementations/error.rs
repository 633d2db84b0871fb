use std::time::Duration;

use crate::structures::{Error, ErrorKind};

impl std::error::Error for Error { }

impl std::fmt::Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Self::ManifestParse(msg) => write!(f, "Could not parse the management document: {}", msg),
      Self::Forbidden(url) => write!(f, "Forbidden (403) for {}: the server refused the request, access from your region may be restricted", url),
      Self::UnexpectedStatus(status, url) => write!(f, "Unexpected status code {} for {}", status, url),
      Self::InvalidUrl(e) => write!(f, "Invalid URL: {}", e),
      Self::HttpError(e) => write!(f, "HTTP request failed: {}", e),
      Self::DownloadTimeout(e) => write!(f, "Download timed out: {}", e),
      Self::HashMismatch(path, got, expected) => write!(f, "Hash of \"{}\" is {} but the manifest expects {}", path, got, expected),
      Self::IoError(e) => write!(f, "I/O error: {}", e),
      Self::JsonError(e) => write!(f, "Invalid JSON: {}", e),
      Self::OutOfRetries(what) => write!(f, "Exceeded max retries: {}", what),
      Self::AlreadyRunning() => write!(f, "A synchronization run is already in progress"),
      Self::Cancelled() => write!(f, "Cancelled"),
      Self::None(msg) => write!(f, "{}", msg),
    }
  }
}

impl From<url::ParseError> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: url::ParseError) -> Self {
    log_error(&error);
    Self::InvalidUrl(error)
  }
}

impl From<reqwest::Error> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: reqwest::Error) -> Self {
    log_error(&error);
    Self::HttpError(error)
  }
}

impl From<tokio::time::error::Elapsed> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: tokio::time::error::Elapsed) -> Self {
    log_error(&error);
    Self::DownloadTimeout(error)
  }
}

impl From<std::io::Error> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: std::io::Error) -> Self {
    log_error(&error);
    Self::IoError(error)
  }
}

impl From<serde_json::Error> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: serde_json::Error) -> Self {
    log_error(&error);
    Self::JsonError(error)
  }
}

#[track_caller]
fn log_error(error: &(impl std::error::Error + ?Sized)) {
  tracing::error!("{:?}", error);
}

impl Error {
  fn variant_name(&self) -> &'static str {
    match self {
      Self::ManifestParse(_) => "ManifestParse",
      Self::Forbidden(_) => "Forbidden",
      Self::UnexpectedStatus(..) => "UnexpectedStatus",
      Self::InvalidUrl(_) => "InvalidUrl",
      Self::HttpError(_) => "HttpError",
      Self::DownloadTimeout(_) => "DownloadTimeout",
      Self::HashMismatch(..) => "HashMismatch",
      Self::IoError(_) => "IoError",
      Self::JsonError(_) => "JsonError",
      Self::OutOfRetries(_) => "OutOfRetries",
      Self::AlreadyRunning() => "AlreadyRunning",
      Self::Cancelled() => "Cancelled",
      Self::None(_) => "None",
    }
  }
}

/// Walks an error's source chain looking for an underlying `std::io::Error`.
fn io_kind_of(error: &(dyn std::error::Error + 'static)) -> Option<std::io::ErrorKind> {
  let mut source = Some(error);
  while let Some(err) = source {
    if let Some(io) = err.downcast_ref::<std::io::Error>() {
      return Some(io.kind());
    }
    source = err.source();
  }
  None
}

impl ErrorKind {
  pub fn classify(error: &Error) -> ErrorKind {
    match error {
      Error::Forbidden(_) => ErrorKind::Forbidden,
      Error::UnexpectedStatus(status, _) => match status {
        403 => ErrorKind::Forbidden,
        400..=499 => ErrorKind::ClientStatus4xx,
        500..=599 => ErrorKind::ServerStatus5xx,
        // 1xx/3xx land with the no-status network errors
        _ => ErrorKind::ClientStatus4xx,
      },
      Error::HashMismatch(..) => ErrorKind::DigestMismatch,
      Error::DownloadTimeout(_) => ErrorKind::Timeout,
      Error::HttpError(e) => {
        if e.is_timeout() {
          ErrorKind::Timeout
        } else {
          match io_kind_of(e) {
            Some(std::io::ErrorKind::ConnectionReset) => ErrorKind::ConnectionReset,
            Some(std::io::ErrorKind::TimedOut) => ErrorKind::Timeout,
            _ => ErrorKind::OtherSocket,
          }
        }
      },
      Error::IoError(e) => match e.kind() {
        std::io::ErrorKind::ConnectionReset => ErrorKind::ConnectionReset,
        std::io::ErrorKind::TimedOut => ErrorKind::Timeout,
        _ => ErrorKind::IoError,
      },
      Error::Cancelled() => ErrorKind::Cancelled,
      other => ErrorKind::Unhandled(format!("Unhandled_{}", other.variant_name())),
    }
  }

  /// Backoff before the next attempt; `None` means the error is terminal.
  pub fn backoff(&self) -> Option<Duration> {
    match self {
      Self::ClientStatus4xx => Some(Duration::from_secs(2)),
      Self::ServerStatus5xx | Self::OtherSocket | Self::Timeout => Some(Duration::from_secs(1)),
      Self::ConnectionReset | Self::IoError | Self::DigestMismatch => Some(Duration::from_millis(500)),
      Self::Unhandled(_) => Some(Duration::from_secs(1)),
      Self::Forbidden | Self::Cancelled => None,
    }
  }

  pub fn is_terminal(&self) -> bool {
    self.backoff().is_none()
  }

  pub fn label(&self) -> String {
    match self {
      Self::Unhandled(tag) => tag.clone(),
      other => format!("{:?}", other),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_codes_follow_the_table() {
    let e = Error::UnexpectedStatus(503, "http://x/a.pat".to_string());
    assert_eq!(ErrorKind::classify(&e), ErrorKind::ServerStatus5xx);
    assert_eq!(ErrorKind::classify(&e).backoff(), Some(Duration::from_secs(1)));

    let e = Error::UnexpectedStatus(404, "http://x/a.pat".to_string());
    assert_eq!(ErrorKind::classify(&e), ErrorKind::ClientStatus4xx);
    assert_eq!(ErrorKind::classify(&e).backoff(), Some(Duration::from_secs(2)));

    let e = Error::UnexpectedStatus(403, "http://x/a.pat".to_string());
    assert_eq!(ErrorKind::classify(&e), ErrorKind::Forbidden);
    assert!(ErrorKind::classify(&e).is_terminal());
  }

  #[test]
  fn digest_mismatch_backs_off_half_a_second() {
    let e = Error::HashMismatch("a.bin".into(), "aa".into(), "bb".into());
    let kind = ErrorKind::classify(&e);
    assert_eq!(kind, ErrorKind::DigestMismatch);
    assert_eq!(kind.backoff(), Some(Duration::from_millis(500)));
  }

  #[test]
  fn socket_reset_is_distinguished_from_other_io() {
    let reset = Error::IoError(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"));
    assert_eq!(ErrorKind::classify(&reset), ErrorKind::ConnectionReset);
    assert_eq!(ErrorKind::classify(&reset).backoff(), Some(Duration::from_millis(500)));

    let denied = Error::IoError(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
    assert_eq!(ErrorKind::classify(&denied), ErrorKind::IoError);
  }

  #[test]
  fn unknown_errors_are_recorded_verbatim() {
    let e = Error::None("weird".to_string());
    match ErrorKind::classify(&e) {
      ErrorKind::Unhandled(tag) => assert_eq!(tag, "Unhandled_None"),
      other => panic!("expected Unhandled, got {:?}", other),
    }
  }

  #[test]
  fn cancellation_is_terminal() {
    let kind = ErrorKind::classify(&Error::Cancelled());
    assert_eq!(kind, ErrorKind::Cancelled);
    assert!(kind.is_terminal());
  }
}
