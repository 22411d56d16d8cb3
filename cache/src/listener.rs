use std::fmt;

/// What caused a background refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
  /// The refresh interval elapsed.
  Timer,
  /// A caller requested a reload.
  Forced,
}

impl fmt::Display for RefreshTrigger {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RefreshTrigger::Timer => write!(f, "timer"),
      RefreshTrigger::Forced => write!(f, "forced"),
    }
  }
}

/// The outcome of a single background refresh attempt.
#[derive(Debug)]
pub enum RefreshEvent<'a> {
  /// The source returned a snapshot and it replaced the previous one.
  Refreshed {
    trigger: RefreshTrigger,
    records: usize,
    generation: u64,
  },
  /// The source failed. The previous snapshot is still being served.
  Failed {
    trigger: RefreshTrigger,
    error: &'a (dyn std::error::Error + Send + Sync + 'static),
  },
}

impl RefreshEvent<'_> {
  pub fn trigger(&self) -> RefreshTrigger {
    match self {
      RefreshEvent::Refreshed { trigger, .. } | RefreshEvent::Failed { trigger, .. } => *trigger,
    }
  }

  pub fn is_failure(&self) -> bool {
    matches!(self, RefreshEvent::Failed { .. })
  }
}

/// A listener that can be registered with the cache to observe every
/// background refresh attempt.
///
/// `on_refresh` runs on the cache's refresh task, after the snapshot has been
/// stored (or kept). A slow listener delays the next refresh, not readers.
pub trait RefreshListener: Send + Sync {
  fn on_refresh(&self, event: &RefreshEvent<'_>);
}
