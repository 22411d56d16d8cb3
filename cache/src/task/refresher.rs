use crate::handles::ReloadStatus;
use crate::listener::RefreshTrigger;
use crate::shared::{RefreshShared, RunningGuard};
use crate::source::Source;
use crate::task::signal::{Signal, Wake};
use crate::task::FAR_FUTURE;

use std::io;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Once;

/// The background thread that keeps a `RefreshingCache` snapshot current.
///
/// The thread owns the source. It is detached: stopping only signals it, so a
/// fetch already in flight runs to completion. Its result is dropped if the
/// stop is seen when the fetch returns.
pub(crate) struct Refresher {
  signal: Arc<Signal>,
  stop_once: Once,
}

impl Refresher {
  /// Spawns a new refresher thread.
  pub(crate) fn spawn<T, S>(shared: Arc<RefreshShared<T>>, source: S) -> io::Result<Self>
  where
    T: Send + Sync + 'static,
    S: Source<T>,
  {
    let signal = Arc::new(Signal::new());
    let thread_signal = signal.clone();

    thread::Builder::new()
      .name(format!("snapcache-{}", shared.name))
      .spawn(move || run(shared, source, thread_signal))?;

    Ok(Self {
      signal,
      stop_once: Once::new(),
    })
  }

  pub(crate) fn request_reload(&self) -> ReloadStatus {
    self.signal.force()
  }

  /// Signals the refresher thread to stop. Only the first call has an effect.
  pub(crate) fn stop(&self) {
    self.stop_once.call_once(|| {
      self.signal.stop();
    });
  }
}

fn run<T, S>(shared: Arc<RefreshShared<T>>, source: S, signal: Arc<Signal>)
where
  S: Source<T>,
{
  let _running = RunningGuard::new(&shared);
  let _closed = CloseOnExit(&signal);

  let interval = shared.refresh_interval;
  let mut deadline = next_deadline(interval);

  loop {
    let trigger = match signal.wait_until(deadline) {
      Wake::Stopped => break,
      Wake::Timer => RefreshTrigger::Timer,
      Wake::Forced => RefreshTrigger::Forced,
    };

    // The next scheduled refresh is always a full interval after this one.
    deadline = next_deadline(interval);
    shared.metrics.record_attempt(trigger);
    let result = source.fetch_all();

    if signal.is_stopped() {
      break;
    }
    shared.apply(trigger, result);
  }
}

fn next_deadline(interval: Duration) -> Instant {
  let now = Instant::now();
  now.checked_add(interval).unwrap_or(now + FAR_FUTURE)
}

// Marks the signal stopped when the thread exits, so `reload` on a cache whose
// thread has died reports `Closed`.
struct CloseOnExit<'a>(&'a Signal);

impl Drop for CloseOnExit<'_> {
  fn drop(&mut self) {
    self.0.stop();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn huge_interval_saturates_the_deadline() {
    let before = Instant::now();
    let deadline = next_deadline(Duration::MAX);
    assert!(deadline >= before + FAR_FUTURE);

    let short = next_deadline(Duration::from_secs(1));
    assert!(short <= Instant::now() + Duration::from_secs(1));
  }
}
