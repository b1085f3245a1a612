use std::sync::Arc;

use anyhow::{Context, Result};

use super::{aws_s3::S3Settings, ObjectFetcher, S3Fetcher};
use crate::config::{BenchConfig, Provider};

/// Builds the fetcher for the configured provider and checks that its bucket
/// is reachable. Every provider speaks the S3 protocol; they differ in
/// addressing style and signing region.
pub async fn create_fetcher(config: &BenchConfig) -> Result<Arc<dyn ObjectFetcher + Send + Sync>> {
  let fetcher = S3Fetcher::new(settings_for(config));
  tracing::info!(
    "Initializing {} storage provider at {} for bucket {}",
    fetcher.provider_name(),
    config.endpoint_url(),
    config.bucket
  );
  fetcher.check_bucket().await.with_context(|| format!("bucket {} is not reachable", config.bucket))?;
  Ok(Arc::new(fetcher))
}

pub fn settings_for(config: &BenchConfig) -> S3Settings {
  let (name, region, path_style) = match config.provider {
    Provider::AliyunOss => ("Aliyun OSS", config.region.clone(), false),
    Provider::AwsS3 => ("AWS S3", config.region.clone(), false),
    Provider::CephS3 => ("Ceph S3", "ceph".to_string(), true),
  };
  S3Settings {
    name,
    endpoint_url: config.endpoint_url(),
    region,
    access_key: config.access_key.clone(),
    secret_key: config.secret_key.clone(),
    bucket: config.bucket.clone(),
    path_style,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config(provider: Provider) -> BenchConfig {
    BenchConfig {
      provider,
      region: "oss-cn-hangzhou".to_string(),
      endpoint: "storage.example.com".to_string(),
      access_key: "ak".to_string(),
      secret_key: "sk".to_string(),
      bucket: "bench".to_string(),
      input_file: "keys.txt".to_string(),
      prefix: None,
      threads: 1,
      sample_interval: 1000,
    }
  }

  #[test]
  fn ceph_uses_path_style_and_fixed_region() {
    let settings = settings_for(&config(Provider::CephS3));
    assert!(settings.path_style);
    assert_eq!(settings.region, "ceph");
    assert_eq!(settings.endpoint_url, "http://storage.example.com");
  }

  #[test]
  fn hosted_providers_use_configured_region() {
    for provider in [Provider::AliyunOss, Provider::AwsS3] {
      let settings = settings_for(&config(provider));
      assert!(!settings.path_style);
      assert_eq!(settings.region, "oss-cn-hangzhou");
      assert_eq!(settings.endpoint_url, "https://storage.example.com");
      assert_eq!(settings.bucket, "bench");
    }
  }
}
