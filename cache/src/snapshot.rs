use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;

/// An immutable, point-in-time copy of every record a source returned.
///
/// A snapshot is never modified after it is stored. Each successful refresh
/// builds a new one with the next generation number and swaps it in whole.
pub struct Snapshot<T> {
  records: Vec<T>,
  generation: u64,
  fetched_at: Instant,
}

impl<T> Snapshot<T> {
  pub(crate) fn new(records: Vec<T>, generation: u64) -> Self {
    Self {
      records,
      generation,
      fetched_at: Instant::now(),
    }
  }

  /// The records, in the order the source returned them.
  #[inline]
  pub fn records(&self) -> &[T] {
    &self.records
  }

  /// `0` for the bootstrap snapshot, incremented on every successful refresh.
  #[inline]
  pub fn generation(&self) -> u64 {
    self.generation
  }

  /// When the fetch that produced this snapshot completed.
  #[inline]
  pub fn fetched_at(&self) -> Instant {
    self.fetched_at
  }

  /// How long ago this snapshot was fetched.
  pub fn age(&self) -> Duration {
    self.fetched_at.elapsed()
  }

  /// Clones the records out of the snapshot.
  pub fn to_vec(&self) -> Vec<T>
  where
    T: Clone,
  {
    self.records.clone()
  }
}

impl<T> Deref for Snapshot<T> {
  type Target = [T];

  fn deref(&self) -> &[T] {
    &self.records
  }
}

impl<'a, T> IntoIterator for &'a Snapshot<T> {
  type Item = &'a T;
  type IntoIter = std::slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.records.iter()
  }
}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Snapshot")
      .field("generation", &self.generation)
      .field("len", &self.records.len())
      .field("records", &self.records)
      .finish_non_exhaustive()
  }
}

/// Holds the current snapshot behind an atomically swappable pointer.
///
/// Readers perform a single atomic load. The refresh task is the only
/// writer, so `replace` may read the previous generation without a CAS loop.
pub(crate) struct SnapshotStore<T> {
  current: ArcSwap<Snapshot<T>>,
}

impl<T> SnapshotStore<T> {
  /// Creates a store holding the bootstrap snapshot (generation 0).
  pub(crate) fn new(bootstrap: Vec<T>) -> Self {
    Self {
      current: ArcSwap::from_pointee(Snapshot::new(bootstrap, 0)),
    }
  }

  #[inline]
  pub(crate) fn load(&self) -> Arc<Snapshot<T>> {
    self.current.load_full()
  }

  /// Swaps in a new snapshot and returns its generation.
  pub(crate) fn replace(&self, records: Vec<T>) -> u64 {
    let generation = self.current.load().generation + 1;
    self.current.store(Arc::new(Snapshot::new(records, generation)));
    generation
  }
}
