use crate::handles::ReloadStatus;
use crate::listener::RefreshTrigger;
use crate::shared::{RefreshShared, RunningGuard};
use crate::source::AsyncSource;
use crate::task::FAR_FUTURE;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Once;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};

/// The background task that keeps an `AsyncRefreshingCache` snapshot current.
pub(crate) struct AsyncRefresher {
  force_tx: mpsc::Sender<()>,
  stop_tx: watch::Sender<bool>,
  stop_once: Once,
}

impl AsyncRefresher {
  /// Spawns the refresh loop onto `runtime`.
  pub(crate) fn spawn<T, S>(runtime: &Handle, shared: Arc<RefreshShared<T>>, source: S) -> Self
  where
    T: Send + Sync + 'static,
    S: AsyncSource<T>,
  {
    // Capacity one: the channel itself is the pending-reload slot.
    let (force_tx, force_rx) = mpsc::channel(1);
    let (stop_tx, stop_rx) = watch::channel(false);

    // Detached: `close` only signals the task and never waits for it.
    runtime.spawn(run(shared, source, force_rx, stop_rx));

    Self {
      force_tx,
      stop_tx,
      stop_once: Once::new(),
    }
  }

  pub(crate) fn request_reload(&self) -> ReloadStatus {
    if *self.stop_tx.borrow() {
      return ReloadStatus::Closed;
    }
    match self.force_tx.try_send(()) {
      Ok(()) => ReloadStatus::Scheduled,
      Err(mpsc::error::TrySendError::Full(())) => ReloadStatus::Coalesced,
      Err(mpsc::error::TrySendError::Closed(())) => ReloadStatus::Closed,
    }
  }

  /// Signals the refresh task to stop. Only the first call has an effect.
  pub(crate) fn stop(&self) {
    self.stop_once.call_once(|| {
      // `send_replace` stores the value even when the task already exited.
      self.stop_tx.send_replace(true);
    });
  }
}

async fn run<T, S>(
  shared: Arc<RefreshShared<T>>,
  source: S,
  mut force_rx: mpsc::Receiver<()>,
  mut stop_rx: watch::Receiver<bool>,
) where
  S: AsyncSource<T>,
{
  // A panic in here unwinds through the guard; the dropped receiver then makes
  // `reload` report `Closed`.
  let _running = RunningGuard::new(&shared);

  let interval = shared.refresh_interval;
  let sleep = time::sleep_until(next_deadline(interval));
  tokio::pin!(sleep);

  loop {
    let trigger = tokio::select! {
      biased;

      // Fires on the stop value and when the handle's sender is dropped.
      _ = stop_rx.changed() => break,
      Some(()) = force_rx.recv() => RefreshTrigger::Forced,
      () = &mut sleep => RefreshTrigger::Timer,
    };

    // The next scheduled refresh is always a full interval after this one.
    sleep.as_mut().reset(next_deadline(interval));
    shared.metrics.record_attempt(trigger);
    let result = source.fetch_all().await;

    if *stop_rx.borrow() {
      break;
    }
    shared.apply(trigger, result);
  }
}

fn next_deadline(interval: Duration) -> Instant {
  let now = Instant::now();
  now.checked_add(interval).unwrap_or(now + FAR_FUTURE)
}
