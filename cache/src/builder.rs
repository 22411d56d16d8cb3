use crate::config::{clamp_interval, RefreshConfig, DEFAULT_REFRESH_INTERVAL, MIN_REFRESH_INTERVAL};
use crate::error::BuildError;
use crate::handles::RefreshingCache;
use crate::listener::RefreshListener;
use crate::shared::RefreshShared;
use crate::source::Source;
use crate::task::refresher::Refresher;

#[cfg(feature = "tokio")]
use crate::handles::AsyncRefreshingCache;
#[cfg(feature = "tokio")]
use crate::source::AsyncSource;
#[cfg(feature = "tokio")]
use crate::task::async_refresher::AsyncRefresher;

use core::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// The name used in logs when none is configured.
const DEFAULT_NAME: &str = "records";

/// A builder for creating `RefreshingCache` and `AsyncRefreshingCache` instances.
pub struct RefreshingCacheBuilder<T, S> {
  source: S,
  name: String,
  refresh_interval: Duration,
  min_refresh_interval: Duration,
  listener: Option<Arc<dyn RefreshListener>>,
  #[cfg(feature = "tokio")]
  runtime: Option<tokio::runtime::Handle>,
  _value_marker: PhantomData<fn() -> T>,
}

// Manual Debug implementation for RefreshingCacheBuilder.
impl<T, S> fmt::Debug for RefreshingCacheBuilder<T, S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RefreshingCacheBuilder")
      .field("name", &self.name)
      .field("refresh_interval", &self.refresh_interval)
      .field("min_refresh_interval", &self.min_refresh_interval)
      .field("has_listener", &self.listener.is_some())
      .finish_non_exhaustive()
  }
}

// --- General Configuration Methods ---
impl<T, S> RefreshingCacheBuilder<T, S> {
  /// Creates a new builder around `source` with default settings.
  pub fn new(source: S) -> Self {
    Self {
      source,
      name: DEFAULT_NAME.to_string(),
      refresh_interval: DEFAULT_REFRESH_INTERVAL,
      min_refresh_interval: MIN_REFRESH_INTERVAL,
      listener: None,
      #[cfg(feature = "tokio")]
      runtime: None,
      _value_marker: PhantomData,
    }
  }

  /// Sets the name used in log events and the refresh thread's name.
  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  /// Sets the interval between scheduled refreshes.
  ///
  /// Values at or below the minimum (one minute unless overridden) are
  /// raised to the minimum when the cache is built.
  pub fn refresh_interval(mut self, interval: Duration) -> Self {
    self.refresh_interval = interval;
    self
  }

  /// Overrides the lower bound applied to the refresh interval.
  /// (Primarily for testing purposes).
  #[doc(hidden)]
  pub fn min_refresh_interval(mut self, interval: Duration) -> Self {
    self.min_refresh_interval = interval;
    self
  }

  /// Applies both intervals from a loaded [`RefreshConfig`].
  ///
  /// The configured minimum is never taken below
  /// [`MIN_CONFIGURABLE_REFRESH_INTERVAL`](crate::config::MIN_CONFIGURABLE_REFRESH_INTERVAL).
  pub fn config(mut self, config: RefreshConfig) -> Self {
    self.refresh_interval = config.refresh_interval;
    self.min_refresh_interval = config.effective_min_interval();
    self
  }

  /// Sets a listener that observes every background refresh attempt.
  pub fn listener<Listener>(mut self, listener: Listener) -> Self
  where
    Listener: RefreshListener + 'static,
  {
    self.listener = Some(Arc::new(listener));
    self
  }

  /// Sets the runtime the async refresh task is spawned on.
  ///
  /// Defaults to the runtime `build_async` is awaited on.
  #[cfg(feature = "tokio")]
  pub fn runtime(mut self, handle: tokio::runtime::Handle) -> Self {
    self.runtime = Some(handle);
    self
  }

  fn into_shared(self, bootstrap: Vec<T>) -> (Arc<RefreshShared<T>>, S) {
    let interval = clamp_interval(self.refresh_interval, self.min_refresh_interval);
    tracing::info!(
      cache = %self.name,
      records = bootstrap.len(),
      refresh_interval = ?interval,
      "{} {} loaded",
      bootstrap.len(),
      self.name
    );
    let shared = Arc::new(RefreshShared::new(self.name, bootstrap, interval, self.listener));
    (shared, self.source)
  }
}

// --- Build Methods ---
impl<T, S> RefreshingCacheBuilder<T, S>
where
  T: Send + Sync + 'static,
  S: Source<T>,
{
  /// Performs the bootstrap fetch and builds a blocking `RefreshingCache`.
  ///
  /// Fails with [`BuildError::Bootstrap`] if the fetch fails, in which case
  /// no background thread is started.
  pub fn build(self) -> Result<RefreshingCache<T>, BuildError<S::Error>> {
    let bootstrap = self.source.fetch_all().map_err(BuildError::Bootstrap)?;
    let (shared, source) = self.into_shared(bootstrap);
    let refresher = Refresher::spawn(shared.clone(), source).map_err(BuildError::Spawn)?;
    Ok(RefreshingCache { shared, refresher })
  }
}

#[cfg(feature = "tokio")]
impl<T, S> RefreshingCacheBuilder<T, S>
where
  T: Send + Sync + 'static,
  S: AsyncSource<T>,
{
  /// Performs the bootstrap fetch and builds an `AsyncRefreshingCache`.
  ///
  /// Fails with [`BuildError::RuntimeRequired`] before fetching if there is
  /// neither a configured runtime nor a current one.
  pub async fn build_async(mut self) -> Result<AsyncRefreshingCache<T>, BuildError<S::Error>> {
    let runtime = match self.runtime.take() {
      Some(handle) => handle,
      None => tokio::runtime::Handle::try_current().map_err(|_| BuildError::RuntimeRequired)?,
    };
    let bootstrap = self
      .source
      .fetch_all()
      .await
      .map_err(BuildError::Bootstrap)?;
    let (shared, source) = self.into_shared(bootstrap);
    let refresher = AsyncRefresher::spawn(&runtime, shared.clone(), source);
    Ok(AsyncRefreshingCache { shared, refresher })
  }
}
