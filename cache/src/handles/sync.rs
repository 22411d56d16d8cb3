use crate::builder::RefreshingCacheBuilder;
use crate::error::{BuildError, CloseError};
use crate::handles::{RefreshingCache, ReloadStatus};
use crate::source::Source;

use std::time::Duration;

impl<T> RefreshingCache<T>
where
  T: Send + Sync + 'static,
{
  /// Builds a cache after a successful bootstrap fetch from `source`.
  ///
  /// `refresh_interval` is raised to [`MIN_REFRESH_INTERVAL`](crate::MIN_REFRESH_INTERVAL)
  /// if it is at or below it. Use [`RefreshingCache::builder`] for more options.
  pub fn new<S>(source: S, refresh_interval: Duration) -> Result<Self, BuildError<S::Error>>
  where
    S: Source<T>,
  {
    RefreshingCacheBuilder::new(source)
      .refresh_interval(refresh_interval)
      .build()
  }

  /// Creates a builder for a cache backed by `source`.
  pub fn builder<S>(source: S) -> RefreshingCacheBuilder<T, S>
  where
    S: Source<T>,
  {
    RefreshingCacheBuilder::new(source)
  }
}

impl<T> RefreshingCache<T> {
  /// Asks the background thread to refresh as soon as it is free.
  ///
  /// Returns immediately without waiting for the fetch. If a request is
  /// already pending this one is coalesced into it. The scheduled timer is
  /// reset when the forced refresh starts.
  pub fn reload(&self) -> ReloadStatus {
    let status = self.refresher.request_reload();
    self.shared.record_reload(status)
  }

  /// Stops the background thread.
  ///
  /// Safe to call any number of times, from any thread. A fetch already in
  /// flight is not interrupted. Its result is normally dropped, but a fetch
  /// that completes just as `close` runs may still be stored once. Reads keep
  /// returning the last snapshot.
  pub fn close(&self) -> Result<(), CloseError> {
    self.refresher.stop();
    Ok(())
  }
}

impl<T> Drop for RefreshingCache<T> {
  fn drop(&mut self) {
    self.refresher.stop();
  }
}
