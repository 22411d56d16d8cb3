use std::{fmt, io};

use thiserror::Error;

/// Errors that can occur when building a refreshing cache.
///
/// `E` is the error type of the cache's source. A failed bootstrap fetch is
/// returned unchanged inside [`BuildError::Bootstrap`], so callers can match
/// on their own error type.
#[derive(Debug, Error)]
pub enum BuildError<E>
where
  E: std::error::Error + 'static,
{
  /// The initial, mandatory fetch failed. No cache was created.
  #[error("bootstrap fetch failed: {0}")]
  Bootstrap(#[source] E),
  /// The background refresh thread could not be spawned.
  #[error("failed to spawn the refresh thread: {0}")]
  Spawn(#[source] io::Error),
  /// An async cache was built outside of a Tokio runtime and no runtime
  /// handle was supplied to the builder.
  #[error("an async cache requires a tokio runtime or an explicit runtime handle")]
  RuntimeRequired,
}

impl<E> BuildError<E>
where
  E: std::error::Error + 'static,
{
  /// Returns the source error if this is a bootstrap failure.
  pub fn into_bootstrap(self) -> Option<E> {
    match self {
      BuildError::Bootstrap(e) => Some(e),
      _ => None,
    }
  }

  /// Returns `true` if the initial fetch failed.
  pub fn is_bootstrap(&self) -> bool {
    matches!(self, BuildError::Bootstrap(_))
  }
}

/// Error returned by `close`.
///
/// Closing currently cannot fail; the type exists so that a future
/// implementation can report shutdown problems without an API break.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CloseError {}

impl fmt::Display for CloseError {
  fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {}
  }
}

impl std::error::Error for CloseError {}
