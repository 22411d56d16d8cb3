use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;

use crate::listener::RefreshTrigger;

/// A thread-safe, internal metrics collector for a refreshing cache.
/// Counters are atomic so the refresh task and callers never contend.
#[derive(Debug)]
pub(crate) struct Metrics {
  // --- Refresh Attempts ---
  pub(crate) refreshes_attempted: CachePadded<AtomicU64>,
  pub(crate) refreshes_succeeded: CachePadded<AtomicU64>,
  pub(crate) refreshes_failed: CachePadded<AtomicU64>,
  pub(crate) timer_refreshes: CachePadded<AtomicU64>,
  pub(crate) forced_refreshes: CachePadded<AtomicU64>,

  // --- Reload Requests ---
  pub(crate) reloads_requested: CachePadded<AtomicU64>,
  pub(crate) reloads_coalesced: CachePadded<AtomicU64>,

  // --- Current Snapshot ---
  pub(crate) record_count: CachePadded<AtomicU64>,
  pub(crate) generation: CachePadded<AtomicU64>,

  last_error: Mutex<Option<String>>,
  created_at: Instant,
}

impl Default for Metrics {
  fn default() -> Self {
    Self {
      refreshes_attempted: CachePadded::new(AtomicU64::new(0)),
      refreshes_succeeded: CachePadded::new(AtomicU64::new(0)),
      refreshes_failed: CachePadded::new(AtomicU64::new(0)),
      timer_refreshes: CachePadded::new(AtomicU64::new(0)),
      forced_refreshes: CachePadded::new(AtomicU64::new(0)),
      reloads_requested: CachePadded::new(AtomicU64::new(0)),
      reloads_coalesced: CachePadded::new(AtomicU64::new(0)),
      record_count: CachePadded::new(AtomicU64::new(0)),
      generation: CachePadded::new(AtomicU64::new(0)),
      last_error: Mutex::new(None),
      created_at: Instant::now(),
    }
  }
}

impl Metrics {
  pub(crate) fn new(bootstrap_records: usize) -> Self {
    let metrics = Self::default();
    metrics
      .record_count
      .store(bootstrap_records as u64, Ordering::Relaxed);
    metrics
  }

  pub(crate) fn record_attempt(&self, trigger: RefreshTrigger) {
    self.refreshes_attempted.fetch_add(1, Ordering::Relaxed);
    match trigger {
      RefreshTrigger::Timer => self.timer_refreshes.fetch_add(1, Ordering::Relaxed),
      RefreshTrigger::Forced => self.forced_refreshes.fetch_add(1, Ordering::Relaxed),
    };
  }

  pub(crate) fn record_success(&self, records: usize, generation: u64) {
    self.refreshes_succeeded.fetch_add(1, Ordering::Relaxed);
    self.record_count.store(records as u64, Ordering::Relaxed);
    self.generation.store(generation, Ordering::Relaxed);
  }

  // Not cleared on success; only the next failure overwrites it.
  pub(crate) fn record_failure(&self, error: &dyn std::error::Error) {
    self.refreshes_failed.fetch_add(1, Ordering::Relaxed);
    *self.last_error.lock() = Some(error.to_string());
  }

  /// Creates a point-in-time snapshot of the current metrics.
  pub(crate) fn snapshot(&self) -> MetricsSnapshot {
    MetricsSnapshot {
      refreshes_attempted: self.refreshes_attempted.load(Ordering::Relaxed),
      refreshes_succeeded: self.refreshes_succeeded.load(Ordering::Relaxed),
      refreshes_failed: self.refreshes_failed.load(Ordering::Relaxed),
      timer_refreshes: self.timer_refreshes.load(Ordering::Relaxed),
      forced_refreshes: self.forced_refreshes.load(Ordering::Relaxed),
      reloads_requested: self.reloads_requested.load(Ordering::Relaxed),
      reloads_coalesced: self.reloads_coalesced.load(Ordering::Relaxed),
      record_count: self.record_count.load(Ordering::Relaxed),
      generation: self.generation.load(Ordering::Relaxed),
      last_error: self.last_error.lock().clone(),
      uptime_secs: self.created_at.elapsed().as_secs(),
    }
  }
}

/// A point-in-time, public-facing snapshot of a cache's metrics.
#[derive(Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
  /// Background fetches started, excluding the bootstrap fetch.
  pub refreshes_attempted: u64,
  /// Background fetches whose result replaced the snapshot.
  pub refreshes_succeeded: u64,
  /// Background fetches that failed and left the snapshot untouched.
  pub refreshes_failed: u64,
  /// Fetches started because the refresh interval elapsed.
  pub timer_refreshes: u64,
  /// Fetches started because of a `reload` request.
  pub forced_refreshes: u64,
  /// Calls to `reload` that scheduled a refresh.
  pub reloads_requested: u64,
  /// Calls to `reload` dropped because a request was already pending.
  pub reloads_coalesced: u64,
  /// Number of records in the current snapshot.
  pub record_count: u64,
  /// Generation of the current snapshot.
  pub generation: u64,
  /// The message of the most recent refresh failure, if any.
  pub last_error: Option<String>,
  /// The number of seconds the cache has been running.
  pub uptime_secs: u64,
}

impl fmt::Debug for MetricsSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MetricsSnapshot")
      .field("refreshes_attempted", &self.refreshes_attempted)
      .field("refreshes_succeeded", &self.refreshes_succeeded)
      .field("refreshes_failed", &self.refreshes_failed)
      .field("timer_refreshes", &self.timer_refreshes)
      .field("forced_refreshes", &self.forced_refreshes)
      .field("reloads_requested", &self.reloads_requested)
      .field("reloads_coalesced", &self.reloads_coalesced)
      .field("record_count", &self.record_count)
      .field("generation", &self.generation)
      .field("last_error", &self.last_error)
      .field("uptime_secs", &self.uptime_secs)
      .finish()
  }
}
