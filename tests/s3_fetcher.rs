use std::io::Write;

use mockito::{Matcher, Server};
use oss_bench::{storage::create_fetcher, BenchConfig, Provider};
use tokio_test::{assert_err, assert_ok};

fn config(endpoint: String) -> BenchConfig {
  BenchConfig {
    provider: Provider::CephS3,
    region: "cn-north-1".to_string(),
    endpoint,
    access_key: "ak".to_string(),
    secret_key: "sk".to_string(),
    bucket: "bench".to_string(),
    input_file: "keys.txt".to_string(),
    prefix: None,
    threads: 1,
    sample_interval: 1000,
  }
}

#[tokio::test]
async fn fetch_counts_body_bytes() {
  let mut server = Server::new_async().await;
  let head = server.mock("HEAD", Matcher::Regex("^/bench".to_string())).with_status(200).create_async().await;
  let get = server
    .mock("GET", Matcher::Regex("^/bench/dir/obj1".to_string()))
    .with_status(200)
    .with_body("hello world")
    .create_async()
    .await;

  let fetcher = assert_ok!(create_fetcher(&config(server.url())).await);
  assert_eq!(fetcher.provider_name(), "Ceph S3");
  assert_eq!(assert_ok!(fetcher.fetch("dir/obj1").await), 11);

  head.assert_async().await;
  get.assert_async().await;
}

#[tokio::test]
async fn empty_object_is_a_success() {
  let mut server = Server::new_async().await;
  server.mock("HEAD", Matcher::Regex("^/bench".to_string())).with_status(200).create_async().await;
  server.mock("GET", Matcher::Regex("^/bench/empty".to_string())).with_status(200).create_async().await;

  let fetcher = assert_ok!(create_fetcher(&config(server.url())).await);
  assert_eq!(assert_ok!(fetcher.fetch("empty").await), 0);
}

#[tokio::test]
async fn missing_object_is_a_fetch_error() {
  let mut server = Server::new_async().await;
  server.mock("HEAD", Matcher::Regex("^/bench".to_string())).with_status(200).create_async().await;
  let get = server
    .mock("GET", Matcher::Regex("^/bench/gone".to_string()))
    .with_status(404)
    .with_header("content-type", "application/xml")
    .with_body("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Error><Code>NoSuchKey</Code><Message>missing</Message></Error>")
    .expect(1)
    .create_async()
    .await;

  let fetcher = assert_ok!(create_fetcher(&config(server.url())).await);
  let err = assert_err!(fetcher.fetch("gone").await);
  assert_eq!(err.bytes, 0);

  // Retries are disabled, so the object is requested exactly once.
  get.assert_async().await;
}

#[tokio::test]
async fn unreachable_bucket_fails_construction() {
  let mut server = Server::new_async().await;
  server.mock("HEAD", Matcher::Regex("^/bench".to_string())).with_status(403).create_async().await;

  let Err(err) = create_fetcher(&config(server.url())).await else {
    panic!("a forbidden bucket must not produce a fetcher");
  };
  assert!(err.to_string().contains("bucket bench is not reachable"));
}

#[tokio::test]
async fn fetch_run_end_to_end_against_fake_endpoint() {
  let mut server = Server::new_async().await;
  server.mock("HEAD", Matcher::Regex("^/bench".to_string())).with_status(200).create_async().await;
  server
    .mock("GET", Matcher::Regex("^/bench/data/(a|b)".to_string()))
    .with_status(200)
    .with_body(vec![0u8; 2048])
    .expect(2)
    .create_async()
    .await;
  server.mock("GET", Matcher::Regex("^/bench/data/c".to_string())).with_status(500).create_async().await;

  let mut file = tempfile::NamedTempFile::new().unwrap();
  writeln!(file, "a\nb 2048\nc").unwrap();
  let mut config = config(server.url());
  config.input_file = file.path().display().to_string();
  config.prefix = Some("data".to_string());
  config.threads = 2;

  let summary = assert_ok!(oss_bench::run(&config).await);
  assert_eq!(summary.success_count, 2);
  assert_eq!(summary.success_bytes, 4096);
  assert_eq!(summary.failed_count, 1);
}
