use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::{
    config::{retry::RetryConfig, Builder, Credentials, Region},
    Client,
};

use super::{FetchError, ObjectFetcher};

/// Connection settings for an S3-compatible endpoint.
#[derive(Clone, Debug)]
pub struct S3Settings {
    pub name: &'static str,
    pub endpoint_url: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub path_style: bool,
}

pub struct S3Fetcher {
    client: Client,
    bucket: String,
    name: &'static str,
}

impl S3Fetcher {
    pub fn new(settings: S3Settings) -> Self {
        let credentials = Credentials::new(settings.access_key, settings.secret_key, None, None, "oss-bench");
        // Every object is fetched exactly once, so the SDK's own retries stay off.
        let config = Builder::new()
            .behavior_version_latest()
            .region(Region::new(settings.region))
            .endpoint_url(settings.endpoint_url)
            .credentials_provider(credentials)
            .force_path_style(settings.path_style)
            .retry_config(RetryConfig::disabled())
            .build();

        S3Fetcher {
            client: Client::from_conf(config),
            bucket: settings.bucket,
            name: settings.name,
        }
    }

    /// Fails when the bucket does not exist or the credentials cannot see it.
    pub async fn check_bucket(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .with_context(|| format!("head bucket {}", self.bucket))?;
        Ok(())
    }
}

#[async_trait]
impl ObjectFetcher for S3Fetcher {
    async fn fetch(&self, key: &str) -> Result<u64, FetchError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(FetchError::new)?;

        let mut body = response.body;
        let mut bytes = 0u64;
        loop {
            match body.try_next().await {
                Ok(Some(chunk)) => bytes += chunk.len() as u64,
                Ok(None) => return Ok(bytes),
                Err(err) => return Err(FetchError::partial(bytes, err)),
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}
