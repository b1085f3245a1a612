//! Download benchmark for S3-compatible object storage.
//!
//! Keys are read from a file and fed through a bounded queue to a fixed pool
//! of downloaders; aggregate throughput is printed on a timer.

pub mod config;
pub mod driver;
pub mod keys;
pub mod pool;
pub mod reporter;
pub mod size;
pub mod stats;
pub mod storage;

pub use config::{BenchConfig, Provider};
pub use driver::{run, Driver};
pub use stats::{Snapshot, Statistics};
pub use storage::{FetchError, ObjectFetcher};
