use std::{
  borrow::Cow,
  fs::File,
  io::{self, BufRead, BufReader},
  path::Path,
};

use anyhow::{Context, Result};
use tokio::{sync::mpsc, task::JoinHandle};

/// Capacity of the queue between the key source and the workers.
pub const QUEUE_CAPACITY: usize = 1024;

/// Object keys read lazily from a line-oriented input, in input order.
///
/// Only the first whitespace-separated token of a line is used; blank lines
/// are skipped. A configured prefix is joined in front of every key.
/// Lines that are not valid UTF-8 are decoded lossily rather than ending
/// the sequence; only an I/O error from the reader does that.
pub struct KeySource<R> {
  reader: R,
  buf: Vec<u8>,
  line_no: u64,
  prefix: Option<String>,
}

impl KeySource<BufReader<File>> {
  pub fn open(path: impl AsRef<Path>, prefix: Option<&str>) -> Result<Self> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open input file {}", path.display()))?;
    Ok(KeySource::new(BufReader::new(file), prefix))
  }
}

impl<R: BufRead> KeySource<R> {
  pub fn new(reader: R, prefix: Option<&str>) -> Self {
    KeySource {
      reader,
      buf: Vec::new(),
      line_no: 0,
      prefix: prefix.filter(|p| !p.is_empty()).map(str::to_owned),
    }
  }
}

impl<R: BufRead> Iterator for KeySource<R> {
  type Item = io::Result<String>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      self.buf.clear();
      match self.reader.read_until(b'\n', &mut self.buf) {
        Ok(0) => return None,
        Ok(_) => self.line_no += 1,
        Err(err) => return Some(Err(err)),
      }
      let line = String::from_utf8_lossy(&self.buf);
      if let Cow::Owned(_) = line {
        tracing::warn!(line = self.line_no, "input line is not valid UTF-8, invalid bytes replaced");
      }
      if let Some(key) = parse_line(&line, self.prefix.as_deref()) {
        return Some(Ok(key));
      }
    }
  }
}

/// The key named by one input line, if any.
pub fn parse_line(line: &str, prefix: Option<&str>) -> Option<String> {
  let key = line.split_whitespace().next()?;
  Some(match prefix {
    Some(prefix) if !prefix.is_empty() => join_key(prefix, key),
    _ => key.to_string(),
  })
}

/// Joins with exactly one `/` between prefix and key.
pub fn join_key(prefix: &str, key: &str) -> String {
  let head = prefix.trim_end_matches('/');
  let tail = key.trim_start_matches('/');
  if head.is_empty() && prefix.starts_with('/') {
    return format!("/{tail}");
  }
  format!("{head}/{tail}")
}

/// Feeds keys into `tx` from a blocking thread. The send blocks while the
/// queue is full; dropping `tx` on exhaustion closes the queue for the
/// workers. Resolves to the number of keys sent.
pub fn spawn_producer<R>(source: KeySource<R>, tx: mpsc::Sender<String>) -> JoinHandle<u64>
where
  R: BufRead + Send + 'static,
{
  tokio::task::spawn_blocking(move || {
    let mut sent = 0u64;
    for key in source {
      let key = match key {
        Ok(key) => key,
        Err(err) => {
          tracing::error!(error = %err, "failed to read input, no more keys will be queued");
          break;
        }
      };
      if tx.blocking_send(key).is_err() {
        tracing::warn!("key queue closed before input was exhausted");
        break;
      }
      sent += 1;
    }
    tracing::info!(keys = sent, "key source exhausted");
    sent
  })
}
