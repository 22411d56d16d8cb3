//! The upstream data providers a refreshing cache pulls its snapshots from.

#[cfg(feature = "tokio")]
use std::future::Future;
use std::sync::Arc;

/// A blocking provider of complete snapshots.
///
/// `fetch_all` must return either every record or an error. Half-built
/// results are never acceptable: whatever is returned replaces the cached
/// snapshot wholesale. Timeouts and retries belong inside the implementation;
/// the cache only observes success or failure.
pub trait Source<T>: Send + Sync + 'static {
  /// The error returned when a fetch fails.
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetches the full set of records.
  fn fetch_all(&self) -> Result<Vec<T>, Self::Error>;
}

impl<T, S> Source<T> for Arc<S>
where
  S: Source<T> + ?Sized,
{
  type Error = S::Error;

  fn fetch_all(&self) -> Result<Vec<T>, Self::Error> {
    (**self).fetch_all()
  }
}

/// The asynchronous counterpart of [`Source`], used by `AsyncRefreshingCache`.
#[cfg(feature = "tokio")]
pub trait AsyncSource<T>: Send + Sync + 'static {
  /// The error returned when a fetch fails.
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetches the full set of records.
  fn fetch_all(&self) -> impl Future<Output = Result<Vec<T>, Self::Error>> + Send;
}

#[cfg(feature = "tokio")]
impl<T, S> AsyncSource<T> for Arc<S>
where
  S: AsyncSource<T>,
{
  type Error = S::Error;

  fn fetch_all(&self) -> impl Future<Output = Result<Vec<T>, Self::Error>> + Send {
    (**self).fetch_all()
  }
}
