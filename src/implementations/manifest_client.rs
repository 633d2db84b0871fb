use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use parking_lot::RwLock;
use tokio_util::io::StreamReader;
use tracing::{debug, instrument, warn};

use crate::structures::{Error, ManifestClient, ManifestEntry, Response, RootDescriptor};
use crate::traits::RemoteSource;

/// Fixed User-Agent the patch servers expect.
const USER_AGENT: &str = "AQUA_HTTP";
/// Keep-alive cap per host; matches the worker count.
const POOL_MAX_PER_HOST: usize = 28;
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

impl ManifestClient {
  pub fn new(management_url: String) -> Result<Self, Error> {
    let http = reqwest::Client::builder()
      .pool_max_idle_per_host(POOL_MAX_PER_HOST)
      .pool_idle_timeout(POOL_IDLE_TIMEOUT)
      .connect_timeout(DEFAULT_TIMEOUT)
      .gzip(true)
      .deflate(true)
      .build()?;
    Ok(Self {
      http,
      management_url,
      root: RwLock::new(None),
    })
  }

  /// Every request carries the same headers: the fixed User-Agent, an
  /// explicit Host, and the no-cache pair.
  fn request(&self, url: &str) -> Result<reqwest::RequestBuilder, Error> {
    let parsed = url::Url::parse(url)?;
    let host = match (parsed.host_str(), parsed.port()) {
      (Some(host), Some(port)) => format!("{}:{}", host, port),
      (Some(host), None) => host.to_string(),
      (None, _) => return Err(Error::None(format!("URL {} has no host", url))),
    };
    Ok(
      self
        .http
        .get(url)
        .header("User-Agent", USER_AGENT)
        .header("Host", host)
        .header("Cache-Control", "no-cache")
        .header("Pragma", "no-cache"),
    )
  }

  /// Advisory timeout from the management document, or 30 s before it is
  /// known.
  fn timeout(&self) -> Duration {
    match self.root.read().as_ref() {
      Some(root) => Duration::from_millis(root.timeout_ms),
      None => DEFAULT_TIMEOUT,
    }
  }

  fn patch_base(&self) -> Result<String, Error> {
    match self.root.read().as_ref() {
      Some(root) => Ok(root.patch_url.clone()),
      None => Err(Error::None("fetch_root must run before fetch_list".to_string())),
    }
  }
}

pub(crate) fn join_url(base: &str, name: &str) -> String {
  format!("{}/{}", base.trim_end_matches('/'), name.trim_start_matches('/'))
}

#[async_trait]
impl RemoteSource for ManifestClient {
  async fn fetch_root(&self) -> Result<RootDescriptor, Error> {
    let request = self.request(&self.management_url)?.timeout(DEFAULT_TIMEOUT);
    let response = request.send().await?;
    let status = response.status();
    if status.as_u16() == 403 {
      return Err(Error::Forbidden(self.management_url.clone()));
    }
    if !status.is_success() {
      return Err(Error::UnexpectedStatus(status.as_u16(), self.management_url.clone()));
    }
    let text = response.text().await?;
    let root = RootDescriptor::parse(&text)?;
    debug!("Management document: {:?}", root);
    *self.root.write() = Some(root.clone());
    Ok(root)
  }

  #[instrument(skip(self))]
  async fn fetch_list(&self, name: &str, reboot: bool) -> Result<Vec<ManifestEntry>, Error> {
    let url = join_url(&self.patch_base()?, name);
    let request = self.request(&url)?.timeout(self.timeout());
    let response = request.send().await?;
    let status = response.status();
    if status.as_u16() == 403 {
      return Err(Error::Forbidden(url));
    }
    if !status.is_success() {
      return Err(Error::UnexpectedStatus(status.as_u16(), url));
    }
    let text = response.text().await?;
    let mut entries = Vec::new();
    for line in text.lines() {
      if line.trim().is_empty() {
        continue;
      }
      match ManifestEntry::parse_line(line, reboot) {
        Some(entry) => entries.push(entry),
        None => warn!("Unparseable row in {}", name),
      }
    }
    debug!("{}: {} entries", name, entries.len());
    Ok(entries)
  }

  async fn open_stream(&self, entry: &ManifestEntry, use_backup: bool) -> Result<Response, Error> {
    let base = match self.root.read().as_ref() {
      Some(root) => root.base_for(entry.channel, use_backup).to_string(),
      None => return Err(Error::None("fetch_root must run before open_stream".to_string())),
    };
    let url = join_url(&base, &entry.name);
    let response = self.request(&url)?.send().await?;
    let status = response.status().as_u16();
    let content_length = response.content_length();
    let stream = response
      .bytes_stream()
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
    Ok(Response {
      status,
      content_length,
      body: Box::new(StreamReader::new(Box::pin(stream))),
    })
  }
}
