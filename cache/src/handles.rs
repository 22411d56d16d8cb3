pub mod sync;

#[cfg(feature = "tokio")]
pub mod futures;

use crate::metrics::MetricsSnapshot;
use crate::shared::RefreshShared;
use crate::snapshot::Snapshot;
#[cfg(feature = "tokio")]
use crate::task::async_refresher::AsyncRefresher;
use crate::task::refresher::Refresher;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The result of a `reload` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadStatus {
  /// A refresh will run as soon as the background task is free.
  Scheduled,
  /// A reload was already pending; this request was merged into it.
  Coalesced,
  /// The cache has been closed. Nothing will run.
  Closed,
}

/// A read-optimised cache of a whole data set, kept fresh by a background
/// thread.
///
/// Reads never block on the source: they return the most recently stored
/// snapshot with a single atomic load. Failed refreshes keep the previous
/// snapshot in place.
pub struct RefreshingCache<T> {
  pub(crate) shared: Arc<RefreshShared<T>>,
  pub(crate) refresher: Refresher,
}

/// The asynchronous twin of [`RefreshingCache`], refreshed by a Tokio task
/// from an [`AsyncSource`](crate::AsyncSource).
#[cfg(feature = "tokio")]
pub struct AsyncRefreshingCache<T> {
  pub(crate) shared: Arc<RefreshShared<T>>,
  pub(crate) refresher: AsyncRefresher,
}

// Methods that do not depend on how the snapshot is refreshed.
macro_rules! impl_read_side {
  ($handle:ident) => {
    impl<T> $handle<T> {
      /// Returns the current snapshot.
      ///
      /// This never fails and never waits for a fetch. The result is the
      /// bootstrap snapshot, the latest successful refresh, or, after a
      /// failed refresh, the last good one.
      #[inline]
      pub fn read(&self) -> Arc<Snapshot<T>> {
        self.shared.store.load()
      }

      /// Returns a snapshot of the cache's metrics.
      pub fn metrics(&self) -> MetricsSnapshot {
        self.shared.metrics.snapshot()
      }

      /// The interval between scheduled refreshes, after clamping.
      pub fn refresh_interval(&self) -> Duration {
        self.shared.refresh_interval
      }

      /// The name used in logs and thread names.
      pub fn name(&self) -> &str {
        &self.shared.name
      }

      /// Returns `true` until the background task has exited.
      pub fn is_running(&self) -> bool {
        self.shared.is_running()
      }
    }

    impl<T> fmt::Debug for $handle<T> {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(stringify!($handle))
          .field("shared", &self.shared)
          .finish_non_exhaustive()
      }
    }
  };
}

impl_read_side!(RefreshingCache);
#[cfg(feature = "tokio")]
impl_read_side!(AsyncRefreshingCache);
