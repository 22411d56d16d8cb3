use crate::builder::RefreshingCacheBuilder;
use crate::error::{BuildError, CloseError};
use crate::handles::{AsyncRefreshingCache, ReloadStatus};
use crate::source::AsyncSource;

use std::time::Duration;

impl<T> AsyncRefreshingCache<T>
where
  T: Send + Sync + 'static,
{
  /// Builds a cache after a successful bootstrap fetch from `source`.
  ///
  /// Must be called within a Tokio runtime; the refresh task is spawned onto
  /// the current one.
  pub async fn new<S>(source: S, refresh_interval: Duration) -> Result<Self, BuildError<S::Error>>
  where
    S: AsyncSource<T>,
  {
    RefreshingCacheBuilder::new(source)
      .refresh_interval(refresh_interval)
      .build_async()
      .await
  }

  /// Creates a builder for a cache backed by `source`.
  pub fn builder<S>(source: S) -> RefreshingCacheBuilder<T, S>
  where
    S: AsyncSource<T>,
  {
    RefreshingCacheBuilder::new(source)
  }
}

impl<T> AsyncRefreshingCache<T> {
  /// Asks the background task to refresh as soon as it is free.
  ///
  /// Non-blocking and not `async`: the request is placed in a single-slot
  /// channel, and dropped if the slot is already occupied.
  pub fn reload(&self) -> ReloadStatus {
    let status = self.refresher.request_reload();
    self.shared.record_reload(status)
  }

  /// Stops the background task. Idempotent; never waits for an in-flight fetch.
  ///
  /// A fetch completing just as `close` runs may still be stored once.
  pub fn close(&self) -> Result<(), CloseError> {
    self.refresher.stop();
    Ok(())
  }
}

impl<T> Drop for AsyncRefreshingCache<T> {
  fn drop(&mut self) {
    self.refresher.stop();
  }
}
