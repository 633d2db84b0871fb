use tokio::io::AsyncRead;

/// A streaming response to an opened download.
pub struct Response {
  pub status: u16,
  pub content_length: Option<u64>,
  pub body: Box<dyn AsyncRead + Send + Unpin>,
}
