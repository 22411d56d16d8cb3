//! A background-refreshing, read-optimised snapshot cache for data sets that
//! live behind a slow or unreliable source.
//!
//! # Features
//! - **Non-Blocking Reads**: `read` is a single atomic pointer load of an
//!   immutable snapshot. Readers never wait on the source.
//! - **Always Initialised**: a cache only exists after a successful bootstrap
//!   fetch, and failed refreshes keep serving the last good snapshot.
//! - **Sync & Async**: `RefreshingCache` is refreshed by a dedicated thread,
//!   `AsyncRefreshingCache` by a Tokio task.
//! - **Coalesced Reloads**: `reload` never blocks; concurrent requests collapse
//!   into a single pending refresh.
//! - **Observability**: structured `tracing` events, metrics, and an optional
//!   refresh listener.

// Public modules that form the API
pub mod builder;
pub mod config;
pub mod directory;
pub mod error;
pub mod handles;
pub mod listener;
pub mod metrics;
pub mod snapshot;
pub mod source;

// Internal, crate-only modules
mod shared;
mod task;

// Re-export the primary user-facing types for convenience
pub use builder::RefreshingCacheBuilder;
pub use config::{
  RefreshConfig, DEFAULT_REFRESH_INTERVAL, MIN_CONFIGURABLE_REFRESH_INTERVAL, MIN_REFRESH_INTERVAL,
};
pub use error::{BuildError, CloseError};
#[cfg(feature = "tokio")]
pub use handles::AsyncRefreshingCache;
pub use handles::{RefreshingCache, ReloadStatus};
pub use listener::{RefreshEvent, RefreshListener, RefreshTrigger};
pub use metrics::MetricsSnapshot;
pub use snapshot::Snapshot;
#[cfg(feature = "tokio")]
pub use source::AsyncSource;
pub use source::Source;
