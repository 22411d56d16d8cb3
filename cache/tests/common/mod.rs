#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, MutexGuard};
use snapcache::{RefreshEvent, RefreshListener, RefreshTrigger, Source};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
  pub id: String,
  pub name: String,
}

pub fn record(id: &str, name: &str) -> Record {
  Record {
    id: id.to_string(),
    name: name.to_string(),
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("upstream unavailable: {0}")]
pub struct StubError(pub String);

// A swappable source. Tests change what the next fetch returns, make fetches
// fail, or hold fetches open with `pause`.
pub struct StubSource {
  records: Mutex<Vec<Record>>,
  fail_next: AtomicUsize,
  failing: AtomicBool,
  calls: AtomicUsize,
  gate: Mutex<()>,
}

impl StubSource {
  pub fn new(records: Vec<Record>) -> Self {
    Self {
      records: Mutex::new(records),
      fail_next: AtomicUsize::new(0),
      failing: AtomicBool::new(false),
      calls: AtomicUsize::new(0),
      gate: Mutex::new(()),
    }
  }

  pub fn set_records(&self, records: Vec<Record>) {
    *self.records.lock() = records;
  }

  // The next `n` fetches fail, then fetches succeed again.
  pub fn fail_next(&self, n: usize) {
    self.fail_next.store(n, Ordering::SeqCst);
  }

  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  // While the guard is alive, blocking fetches start (and are counted) but
  // cannot complete.
  pub fn pause(&self) -> MutexGuard<'_, ()> {
    self.gate.lock()
  }

  fn next_result(&self) -> Result<Vec<Record>, StubError> {
    if self.failing.load(Ordering::SeqCst) {
      return Err(StubError("source is down".to_string()));
    }
    let consumed = self
      .fail_next
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    if consumed.is_ok() {
      return Err(StubError("transient failure".to_string()));
    }
    Ok(self.records.lock().clone())
  }
}

impl Source<Record> for StubSource {
  type Error = StubError;

  fn fetch_all(&self) -> Result<Vec<Record>, StubError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let _gate = self.gate.lock();
    self.next_result()
  }
}

#[cfg(feature = "tokio")]
impl snapcache::AsyncSource<Record> for StubSource {
  type Error = StubError;

  async fn fetch_all(&self) -> Result<Vec<Record>, StubError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    tokio::task::yield_now().await;
    self.next_result()
  }
}

pub type EventLog = Vec<(RefreshTrigger, Result<usize, String>)>;

// Records every refresh event as (trigger, Ok(records) | Err(message)).
// Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingListener {
  events: Arc<Mutex<EventLog>>,
}

impl RecordingListener {
  pub fn events(&self) -> EventLog {
    self.events.lock().clone()
  }
}

impl RefreshListener for RecordingListener {
  fn on_refresh(&self, event: &RefreshEvent<'_>) {
    let entry = match event {
      RefreshEvent::Refreshed {
        trigger, records, ..
      } => (*trigger, Ok(*records)),
      RefreshEvent::Failed { trigger, error } => (*trigger, Err(error.to_string())),
    };
    self.events.lock().push(entry);
  }
}

// A listener that panics on every event, taking the refresh task down with it.
pub struct PanickingListener;

impl RefreshListener for PanickingListener {
  fn on_refresh(&self, _event: &RefreshEvent<'_>) {
    panic!("listener failed");
  }
}

// Polls `condition` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
  let deadline = Instant::now() + timeout;
  while Instant::now() < deadline {
    if condition() {
      return true;
    }
    thread::sleep(Duration::from_millis(5));
  }
  condition()
}
