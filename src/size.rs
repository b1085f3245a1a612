use std::fmt;

use serde::{Serialize, Serializer};

const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// A byte count rendered with binary scaling: `1536` prints as `1.50KB`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteSize(pub u64);

impl ByteSize {
  /// A rate such as bytes per second. Non-finite and negative values,
  /// which show up before any time has elapsed, clamp to zero.
  pub fn from_rate(rate: f64) -> Self {
    if rate.is_finite() && rate > 0.0 {
      ByteSize(rate as u64)
    } else {
      ByteSize(0)
    }
  }
}

impl fmt::Display for ByteSize {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.0 < 1024 {
      return write!(f, "{}B", self.0);
    }
    let mut scaled = self.0 as f64 / 1024.0;
    let mut unit = 0;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
      scaled /= 1024.0;
      unit += 1;
    }
    write!(f, "{scaled:.2}{}", UNITS[unit])
  }
}

impl Serialize for ByteSize {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}
