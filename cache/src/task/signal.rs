use crate::handles::ReloadStatus;

use std::time::Instant;

use parking_lot::{Condvar, Mutex};

/// Why the refresh thread woke up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wake {
  Timer,
  Forced,
  Stopped,
}

#[derive(Debug, Default)]
struct SignalState {
  // Single slot: a second request while this is set is dropped.
  force_pending: bool,
  stopped: bool,
}

/// Wakes the blocking refresh thread for a forced reload or shutdown.
#[derive(Debug, Default)]
pub(crate) struct Signal {
  state: Mutex<SignalState>,
  cond: Condvar,
}

impl Signal {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Requests a forced reload. Never blocks beyond the state lock.
  pub(crate) fn force(&self) -> ReloadStatus {
    let mut state = self.state.lock();
    if state.stopped {
      return ReloadStatus::Closed;
    }
    if state.force_pending {
      return ReloadStatus::Coalesced;
    }
    state.force_pending = true;
    drop(state);
    self.cond.notify_one();
    ReloadStatus::Scheduled
  }

  /// Marks the signal stopped. Returns `false` if it already was.
  pub(crate) fn stop(&self) -> bool {
    let mut state = self.state.lock();
    if state.stopped {
      return false;
    }
    state.stopped = true;
    state.force_pending = false;
    drop(state);
    self.cond.notify_all();
    true
  }

  pub(crate) fn is_stopped(&self) -> bool {
    self.state.lock().stopped
  }

  /// Blocks until `deadline`, a forced reload, or a stop, whichever is first.
  ///
  /// A stop wins over a pending force, and a pending force wins over an
  /// elapsed deadline. Consuming a force clears the slot.
  pub(crate) fn wait_until(&self, deadline: Instant) -> Wake {
    let mut state = self.state.lock();
    loop {
      if state.stopped {
        return Wake::Stopped;
      }
      if state.force_pending {
        state.force_pending = false;
        return Wake::Forced;
      }
      if Instant::now() >= deadline {
        return Wake::Timer;
      }
      // Spurious wake-ups and timeouts both fall through to the checks above.
      let _ = self.cond.wait_until(&mut state, deadline);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;
  use std::thread;
  use std::time::Duration;

  #[test]
  fn second_force_is_coalesced() {
    let signal = Signal::new();
    assert_eq!(signal.force(), ReloadStatus::Scheduled);
    assert_eq!(signal.force(), ReloadStatus::Coalesced);

    let far = Instant::now() + Duration::from_secs(60);
    assert_eq!(signal.wait_until(far), Wake::Forced);

    // The slot is free again once consumed.
    assert_eq!(signal.force(), ReloadStatus::Scheduled);
  }

  #[test]
  fn elapsed_deadline_reports_timer() {
    let signal = Signal::new();
    let deadline = Instant::now() + Duration::from_millis(20);
    assert_eq!(signal.wait_until(deadline), Wake::Timer);
    assert!(Instant::now() >= deadline);
  }

  #[test]
  fn stop_wins_and_is_idempotent() {
    let signal = Signal::new();
    assert_eq!(signal.force(), ReloadStatus::Scheduled);
    assert!(signal.stop());
    assert!(!signal.stop());
    assert_eq!(signal.wait_until(Instant::now()), Wake::Stopped);
    assert_eq!(signal.force(), ReloadStatus::Closed);
  }

  #[test]
  fn force_wakes_a_blocked_waiter() {
    let signal = Arc::new(Signal::new());
    let waiter = {
      let signal = signal.clone();
      thread::spawn(move || signal.wait_until(Instant::now() + Duration::from_secs(30)))
    };

    thread::sleep(Duration::from_millis(20));
    signal.force();
    assert_eq!(waiter.join().unwrap(), Wake::Forced);
  }
}
