//! This module contains the background refresh tasks: a dedicated thread for
//! the blocking cache and a Tokio task for the async cache.

use std::time::Duration;

#[cfg(feature = "tokio")]
pub(crate) mod async_refresher;
pub(crate) mod refresher;
pub(crate) mod signal;

/// Used in place of a deadline that would overflow `Instant`, so an interval
/// of `Duration::MAX` means "forced refreshes only".
pub(crate) const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);
