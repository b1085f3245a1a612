use std::time::Duration;

use clap::{Args, ValueEnum};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Args)]
pub struct BenchConfig {
  /// The storage service provider.
  #[clap(long, env = "OSS_BENCH_PROVIDER")]
  pub provider: Provider,
  /// Signing region. Ceph gateways ignore it.
  #[clap(long, env = "OSS_BENCH_REGION", default_value = "cn-north-1")]
  pub region: String,
  /// Service endpoint, with or without a scheme.
  #[clap(long, env = "OSS_BENCH_ENDPOINT", default_value = "")]
  pub endpoint: String,
  /// Access key id
  #[clap(long, env = "OSS_BENCH_ACCESS_KEY", default_value = "", hide_env_values = true)]
  pub access_key: String,
  /// Secret access key
  #[clap(long, env = "OSS_BENCH_SECRET_KEY", default_value = "", hide_env_values = true)]
  pub secret_key: String,
  /// Bucket holding the objects under test
  #[clap(long, env = "OSS_BENCH_BUCKET", default_value = "")]
  pub bucket: String,
  /// File containing the object list to test, one key per line
  #[clap(long = "file", env = "OSS_BENCH_INPUT_FILE", default_value = "")]
  pub input_file: String,
  /// Prefix joined in front of every object key
  #[clap(long, env = "OSS_BENCH_PREFIX")]
  pub prefix: Option<String>,
  /// Number of concurrent downloaders
  #[clap(long = "thread", env = "OSS_BENCH_THREADS", default_value_t = num_cpus::get())]
  pub threads: usize,
  /// Report interval in milliseconds
  #[clap(long, env = "OSS_BENCH_SAMPLE_INTERVAL", default_value_t = 1000)]
  pub sample_interval: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("missing {0}")]
  Missing(&'static str),
  #[error("thread count must be at least 1")]
  NoThreads,
  #[error("sample interval must be at least 1ms")]
  ZeroInterval,
}

impl BenchConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    let required = [
      ("endpoint", &self.endpoint),
      ("access key", &self.access_key),
      ("secret key", &self.secret_key),
      ("bucket", &self.bucket),
      ("input file", &self.input_file),
    ];
    if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
      return Err(ConfigError::Missing(*name));
    }
    if self.threads == 0 {
      return Err(ConfigError::NoThreads);
    }
    if self.sample_interval == 0 {
      return Err(ConfigError::ZeroInterval);
    }
    Ok(())
  }

  pub fn interval(&self) -> Duration {
    Duration::from_millis(self.sample_interval)
  }

  /// The prefix, or `None` when it is unset or blank.
  pub fn key_prefix(&self) -> Option<&str> {
    self.prefix.as_deref().filter(|prefix| !prefix.is_empty())
  }

  /// The endpoint as a URL. A bare host gets `https://`, except for Ceph
  /// gateways which are spoken to over plain HTTP.
  pub fn endpoint_url(&self) -> String {
    let endpoint = self.endpoint.trim();
    if endpoint.contains("://") {
      return endpoint.to_string();
    }
    match self.provider {
      Provider::CephS3 => format!("http://{endpoint}"),
      Provider::AliyunOss | Provider::AwsS3 => format!("https://{endpoint}"),
    }
  }
}

#[derive(Clone, Copy, ValueEnum, Debug, Display, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
  #[display("aliyun-oss")]
  AliyunOss,
  #[display("aws-s3")]
  AwsS3,
  #[display("ceph-s3")]
  CephS3,
}
