mod common;

use common::{record, Record, StubError, StubSource};
use pretty_assertions::assert_eq;
use snapcache::{BuildError, RefreshingCache, ReloadStatus, MIN_REFRESH_INTERVAL};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_bootstrap_failure_returns_source_error() {
  let source = Arc::new(StubSource::new(vec![record("1", "A")]));
  source.set_failing(true);

  let result: Result<RefreshingCache<Record>, _> =
    RefreshingCache::new(source.clone(), Duration::from_secs(120));

  match result {
    Err(BuildError::Bootstrap(err)) => {
      assert_eq!(err, StubError("source is down".to_string()));
    }
    other => panic!("expected a bootstrap error, got {:?}", other.map(|_| ())),
  }

  // No background task was started, so nothing fetches again.
  thread::sleep(Duration::from_millis(50));
  assert_eq!(source.calls(), 1);
}

#[test]
fn test_bootstrap_error_is_inspectable() {
  let source = Arc::new(StubSource::new(Vec::new()));
  source.fail_next(1);

  let err = RefreshingCache::<Record>::new(source, Duration::from_secs(120)).unwrap_err();
  assert!(err.is_bootstrap());
  assert_eq!(err.to_string(), "bootstrap fetch failed: transient failure");
  assert_eq!(err.into_bootstrap(), Some(StubError("transient failure".to_string())));
}

#[test]
fn test_read_returns_bootstrap_snapshot_immediately() {
  let source = Arc::new(StubSource::new(vec![record("1", "A")]));
  let cache: RefreshingCache<Record> =
    RefreshingCache::new(source.clone(), Duration::from_secs(120)).unwrap();

  let snapshot = cache.read();
  assert_eq!(snapshot.records(), &[record("1", "A")]);
  assert_eq!(snapshot.generation(), 0);
  assert_eq!(source.calls(), 1);
  assert!(cache.is_running());

  let metrics = cache.metrics();
  assert_eq!(metrics.record_count, 1);
  assert_eq!(metrics.refreshes_attempted, 0);
  assert_eq!(metrics.last_error, None);
}

#[test]
fn test_short_interval_is_clamped_to_minimum() {
  let source = Arc::new(StubSource::new(Vec::new()));

  let cache: RefreshingCache<Record> =
    RefreshingCache::new(source.clone(), Duration::from_millis(10)).unwrap();
  assert_eq!(cache.refresh_interval(), MIN_REFRESH_INTERVAL);

  let at_minimum: RefreshingCache<Record> =
    RefreshingCache::new(source.clone(), MIN_REFRESH_INTERVAL).unwrap();
  assert_eq!(at_minimum.refresh_interval(), MIN_REFRESH_INTERVAL);

  let longer: RefreshingCache<Record> =
    RefreshingCache::new(source.clone(), Duration::from_secs(600)).unwrap();
  assert_eq!(longer.refresh_interval(), Duration::from_secs(600));

  // With a one minute floor nothing refreshes during the test.
  thread::sleep(Duration::from_millis(100));
  assert_eq!(source.calls(), 3);
}

#[test]
fn test_builder_sets_name() {
  let source = Arc::new(StubSource::new(Vec::new()));
  let cache: RefreshingCache<Record> = RefreshingCache::builder(source)
    .name("issues")
    .build()
    .unwrap();

  assert_eq!(cache.name(), "issues");
  assert_eq!(cache.refresh_interval(), snapcache::DEFAULT_REFRESH_INTERVAL);
}

#[test]
fn test_empty_bootstrap_is_a_valid_snapshot() {
  let source = Arc::new(StubSource::new(Vec::new()));
  let cache: RefreshingCache<Record> = RefreshingCache::new(source, Duration::from_secs(120)).unwrap();

  assert!(cache.read().is_empty());
  assert_eq!(cache.reload(), ReloadStatus::Scheduled);
}
