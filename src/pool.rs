use std::sync::Arc;

use anyhow::{Context, Result};
use futures_util::future::try_join_all;
use tokio::sync::{mpsc, Mutex};

use crate::{stats::Statistics, storage::ObjectFetcher};

pub type SharedFetcher = Arc<dyn ObjectFetcher + Send + Sync>;

/// A fixed set of downloaders draining one shared key queue.
pub struct WorkerPool {
  workers: usize,
  fetcher: SharedFetcher,
  stats: Arc<Statistics>,
}

impl WorkerPool {
  pub fn new(workers: usize, fetcher: SharedFetcher, stats: Arc<Statistics>) -> Self {
    WorkerPool { workers, fetcher, stats }
  }

  /// Runs until the queue is closed and empty and every worker has exited.
  pub async fn run(&self, queue: mpsc::Receiver<String>) -> Result<()> {
    tracing::info!(workers = self.workers, provider = self.fetcher.provider_name(), "starting downloads");
    let queue = Arc::new(Mutex::new(queue));
    let handles = (0..self.workers).map(|id| {
      let queue = queue.clone();
      let fetcher = self.fetcher.clone();
      let stats = self.stats.clone();
      tokio::spawn(work(id, queue, fetcher, stats))
    });
    try_join_all(handles).await.context("download worker panicked")?;
    Ok(())
  }
}

async fn work(id: usize, queue: Arc<Mutex<mpsc::Receiver<String>>>, fetcher: SharedFetcher, stats: Arc<Statistics>) {
  loop {
    // Idle workers queue on the lock while its holder waits on the channel.
    // The guard drops once a key (or closure) arrives, before the fetch.
    let next = queue.lock().await.recv().await;
    let Some(key) = next else {
      break;
    };
    match fetcher.fetch(&key).await {
      Ok(bytes) => {
        stats.add_success_count(1);
        stats.add_success_bytes(bytes);
      }
      Err(err) => {
        tracing::error!(key = %key, error = %err, "failed to download object");
        stats.add_failed_count(1);
        stats.add_failed_bytes(err.bytes);
      }
    }
  }
  tracing::debug!(worker = id, "queue drained");
}
