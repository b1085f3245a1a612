use async_trait::async_trait;
use thiserror::Error;

pub mod aws_s3;
pub mod factory;

/// Downloads one object and reports how many bytes came back. The payload
/// itself is discarded.
#[async_trait]
pub trait ObjectFetcher {
  async fn fetch(&self, key: &str) -> Result<u64, FetchError>;
  fn provider_name(&self) -> &'static str;
}

/// A failed download, with whatever was transferred before it failed.
#[derive(Debug, Error)]
#[error("{cause:#}")]
pub struct FetchError {
  pub bytes: u64,
  pub cause: anyhow::Error,
}

impl FetchError {
  pub fn new(cause: impl Into<anyhow::Error>) -> Self {
    FetchError { bytes: 0, cause: cause.into() }
  }

  pub fn partial(bytes: u64, cause: impl Into<anyhow::Error>) -> Self {
    FetchError { bytes, cause: cause.into() }
  }
}

pub use aws_s3::S3Fetcher;
pub use factory::create_fetcher;
