use crate::handles::ReloadStatus;
use crate::listener::{RefreshEvent, RefreshListener, RefreshTrigger};
use crate::metrics::Metrics;
use crate::snapshot::SnapshotStore;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// The internal, thread-safe core shared by a cache handle and its refresh task.
pub(crate) struct RefreshShared<T> {
  pub(crate) name: String,
  pub(crate) store: SnapshotStore<T>,
  pub(crate) metrics: Metrics,
  pub(crate) listener: Option<Arc<dyn RefreshListener>>,
  pub(crate) refresh_interval: Duration,
  pub(crate) running: AtomicBool,
}

impl<T> fmt::Debug for RefreshShared<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RefreshShared")
      .field("name", &self.name)
      .field("refresh_interval", &self.refresh_interval)
      .field("running", &self.running.load(Ordering::Relaxed))
      .field("metrics", &self.metrics.snapshot())
      .finish_non_exhaustive()
  }
}

impl<T> RefreshShared<T> {
  pub(crate) fn new(
    name: String,
    bootstrap: Vec<T>,
    refresh_interval: Duration,
    listener: Option<Arc<dyn RefreshListener>>,
  ) -> Self {
    let metrics = Metrics::new(bootstrap.len());
    Self {
      name,
      store: SnapshotStore::new(bootstrap),
      metrics,
      listener,
      refresh_interval,
      running: AtomicBool::new(true),
    }
  }

  /// Applies the result of one background fetch.
  ///
  /// On success the snapshot is replaced whole. On failure the stored snapshot
  /// is left untouched and the error is only logged and recorded.
  pub(crate) fn apply<E>(&self, trigger: RefreshTrigger, result: Result<Vec<T>, E>)
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    match result {
      Ok(records) => {
        let count = records.len();
        let generation = self.store.replace(records);
        self.metrics.record_success(count, generation);
        tracing::info!(
          cache = %self.name,
          %trigger,
          records = count,
          generation,
          "{} {} loaded",
          count,
          self.name
        );
        self.notify(&RefreshEvent::Refreshed {
          trigger,
          records: count,
          generation,
        });
      }
      Err(error) => {
        self.metrics.record_failure(&error);
        tracing::warn!(
          cache = %self.name,
          %trigger,
          error = %error,
          generation = self.store.load().generation(),
          "error loading {}, keeping previous snapshot",
          self.name
        );
        self.notify(&RefreshEvent::Failed {
          trigger,
          error: &error,
        });
      }
    }
  }

  fn notify(&self, event: &RefreshEvent<'_>) {
    if let Some(listener) = &self.listener {
      listener.on_refresh(event);
    }
  }

  /// Counts a reload request in the metrics and hands the status back.
  pub(crate) fn record_reload(&self, status: ReloadStatus) -> ReloadStatus {
    match status {
      ReloadStatus::Scheduled => {
        self
          .metrics
          .reloads_requested
          .fetch_add(1, Ordering::Relaxed);
      }
      ReloadStatus::Coalesced => {
        self
          .metrics
          .reloads_coalesced
          .fetch_add(1, Ordering::Relaxed);
      }
      ReloadStatus::Closed => {}
    }
    status
  }

  pub(crate) fn mark_stopped(&self) {
    if self.running.swap(false, Ordering::AcqRel) {
      tracing::debug!(cache = %self.name, "refresh task stopped");
    }
  }

  #[inline]
  pub(crate) fn is_running(&self) -> bool {
    self.running.load(Ordering::Acquire)
  }
}

/// Clears the running flag when a refresh task exits, including by unwinding
/// out of a source or listener panic.
pub(crate) struct RunningGuard<'a, T>(&'a RefreshShared<T>);

impl<'a, T> RunningGuard<'a, T> {
  pub(crate) fn new(shared: &'a RefreshShared<T>) -> Self {
    Self(shared)
  }
}

impl<T> Drop for RunningGuard<'_, T> {
  fn drop(&mut self) {
    if std::thread::panicking() {
      tracing::error!(cache = %self.0.name, "refresh task panicked, no further refreshes will run");
    }
    self.0.mark_stopped();
  }
}
