use std::{io::Write, sync::Arc, time::Duration};

use tokio::{
  task::JoinHandle,
  time::{interval_at, Instant, MissedTickBehavior},
};

use crate::stats::Statistics;

/// Writes one snapshot line to `sink` every `period`, first one period after
/// the call. The task runs until the runtime shuts down.
pub fn spawn_reporter<W>(stats: Arc<Statistics>, period: Duration, mut sink: W) -> JoinHandle<()>
where
  W: Write + Send + 'static,
{
  tokio::spawn(async move {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
      ticker.tick().await;
      let snapshot = stats.snapshot();
      if let Err(err) = writeln!(sink, "{snapshot}").and_then(|()| sink.flush()) {
        tracing::warn!(error = %err, "failed to write report");
      }
    }
  })
}
