use std::{
  fmt,
  sync::atomic::{AtomicU64, Ordering},
  time::{Duration, Instant},
};

use serde::Serialize;

use crate::size::ByteSize;

/// Lock-free run counters, shared by every worker and the reporter.
///
/// Each counter is its own atomic, so a count and its byte total are not
/// updated together. Readers may see one ahead of the other; once the
/// workers are quiescent `total == success + failed` holds for both.
#[derive(Debug)]
pub struct Statistics {
  started_at: Instant,
  total_count: AtomicU64,
  total_bytes: AtomicU64,
  success_count: AtomicU64,
  success_bytes: AtomicU64,
  failed_count: AtomicU64,
  failed_bytes: AtomicU64,
  last_total_count: AtomicU64,
  last_total_bytes: AtomicU64,
}

impl Default for Statistics {
  fn default() -> Self {
    Self::new()
  }
}

impl Statistics {
  /// Starts the clock.
  pub fn new() -> Self {
    Statistics {
      started_at: Instant::now(),
      total_count: AtomicU64::new(0),
      total_bytes: AtomicU64::new(0),
      success_count: AtomicU64::new(0),
      success_bytes: AtomicU64::new(0),
      failed_count: AtomicU64::new(0),
      failed_bytes: AtomicU64::new(0),
      last_total_count: AtomicU64::new(0),
      last_total_bytes: AtomicU64::new(0),
    }
  }

  pub fn add_success_count(&self, count: u64) {
    self.success_count.fetch_add(count, Ordering::Relaxed);
    self.total_count.fetch_add(count, Ordering::Relaxed);
  }

  pub fn add_success_bytes(&self, bytes: u64) {
    self.success_bytes.fetch_add(bytes, Ordering::Relaxed);
    self.total_bytes.fetch_add(bytes, Ordering::Relaxed);
  }

  pub fn add_failed_count(&self, count: u64) {
    self.failed_count.fetch_add(count, Ordering::Relaxed);
    self.total_count.fetch_add(count, Ordering::Relaxed);
  }

  pub fn add_failed_bytes(&self, bytes: u64) {
    self.failed_bytes.fetch_add(bytes, Ordering::Relaxed);
    self.total_bytes.fetch_add(bytes, Ordering::Relaxed);
  }

  /// Reads every counter and advances the delta baseline. Deltas are only
  /// meaningful between consecutive calls from a single reader.
  pub fn snapshot(&self) -> Snapshot {
    let total_count = self.total_count.load(Ordering::Relaxed);
    let total_bytes = self.total_bytes.load(Ordering::Relaxed);
    let last_count = self.last_total_count.swap(total_count, Ordering::Relaxed);
    let last_bytes = self.last_total_bytes.swap(total_bytes, Ordering::Relaxed);
    Snapshot {
      elapsed: self.started_at.elapsed(),
      total_count,
      total_bytes,
      success_count: self.success_count.load(Ordering::Relaxed),
      success_bytes: self.success_bytes.load(Ordering::Relaxed),
      failed_count: self.failed_count.load(Ordering::Relaxed),
      failed_bytes: self.failed_bytes.load(Ordering::Relaxed),
      delta_count: total_count.saturating_sub(last_count),
      delta_bytes: total_bytes.saturating_sub(last_bytes),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
  pub elapsed: Duration,
  pub total_count: u64,
  pub total_bytes: u64,
  pub success_count: u64,
  pub success_bytes: u64,
  pub failed_count: u64,
  pub failed_bytes: u64,
  pub delta_count: u64,
  pub delta_bytes: u64,
}

impl Snapshot {
  /// Overall throughput in bytes per second. `NaN` or infinite when no
  /// time has elapsed.
  pub fn speed(&self) -> f64 {
    self.total_bytes as f64 / self.elapsed.as_secs_f64()
  }

  pub fn success_speed(&self) -> f64 {
    self.success_bytes as f64 / self.elapsed.as_secs_f64()
  }

  fn record(&self) -> Record {
    Record {
      elapsed: format!("{:.2}s", self.elapsed.as_secs_f64()),
      total_size: ByteSize(self.total_bytes),
      total_count: self.total_count,
      speed: format!("{}/s", ByteSize::from_rate(self.speed())),
      success_size: ByteSize(self.success_bytes),
      success_count: self.success_count,
      success_speed: format!("{}/s", ByteSize::from_rate(self.success_speed())),
      failed_size: ByteSize(self.failed_bytes),
      failed_count: self.failed_count,
      delta_count: self.delta_count,
      delta_size: ByteSize(self.delta_bytes),
    }
  }
}

#[derive(Serialize)]
struct Record {
  elapsed: String,
  total_size: ByteSize,
  total_count: u64,
  speed: String,
  success_size: ByteSize,
  success_count: u64,
  success_speed: String,
  failed_size: ByteSize,
  failed_count: u64,
  delta_count: u64,
  delta_size: ByteSize,
}

/// Single-line JSON report.
impl fmt::Display for Snapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let line = serde_json::to_string(&self.record()).map_err(|_| fmt::Error)?;
    f.write_str(&line)
  }
}
