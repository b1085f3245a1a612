use std::{io::BufRead, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::{
  config::BenchConfig,
  keys::{spawn_producer, KeySource, QUEUE_CAPACITY},
  pool::{SharedFetcher, WorkerPool},
  reporter::spawn_reporter,
  stats::{Snapshot, Statistics},
  storage::create_fetcher,
};

/// Validates the configuration, connects to the bucket and downloads every
/// listed object, reporting to stdout. Any setup failure is returned before
/// a single object is requested.
pub async fn run(config: &BenchConfig) -> Result<Snapshot> {
  config.validate().context("invalid configuration")?;
  let source = KeySource::open(&config.input_file, config.key_prefix())?;
  let fetcher = create_fetcher(config).await?;
  let driver = Driver::new(fetcher, config.threads, config.interval());
  driver.run(source, std::io::stdout()).await
}

pub struct Driver {
  fetcher: SharedFetcher,
  threads: usize,
  interval: Duration,
}

impl Driver {
  pub fn new(fetcher: SharedFetcher, threads: usize, interval: Duration) -> Self {
    Driver { fetcher, threads, interval }
  }

  /// Feeds `source` through the worker pool and returns the final counters.
  /// The reporter is left running; it stops with the runtime.
  pub async fn run<R, W>(&self, source: KeySource<R>, report_sink: W) -> Result<Snapshot>
  where
    R: BufRead + Send + 'static,
    W: std::io::Write + Send + 'static,
  {
    let stats = Arc::new(Statistics::new());
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);

    spawn_reporter(stats.clone(), self.interval, report_sink);
    let producer = spawn_producer(source, tx);
    WorkerPool::new(self.threads, self.fetcher.clone(), stats.clone()).run(rx).await?;
    let emitted = producer.await.context("key source panicked")?;

    let summary = stats.snapshot();
    tracing::info!(
      keys = emitted,
      success = summary.success_count,
      failed = summary.failed_count,
      "benchmark finished: {summary}"
    );
    Ok(summary)
  }
}
