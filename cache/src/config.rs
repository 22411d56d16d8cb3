use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The interval used when none is configured.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// The lowest refresh interval a cache will accept. Anything at or below it is
/// raised to it, bounding the load a cache can put on its source.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// The lowest minimum a [`RefreshConfig`] can set. A configured
/// `min_refresh_interval` below it (including zero) is raised to it.
pub const MIN_CONFIGURABLE_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Refresh timing for a cache, loadable from configuration files.
///
/// With the `serde` feature, durations are written in humantime notation:
///
/// ```text
/// { "refresh_interval": "10m", "min_refresh_interval": "1m" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct RefreshConfig {
  #[cfg_attr(feature = "serde", serde(with = "humantime_duration"))]
  pub refresh_interval: Duration,
  #[cfg_attr(feature = "serde", serde(with = "humantime_duration"))]
  pub min_refresh_interval: Duration,
}

impl Default for RefreshConfig {
  fn default() -> Self {
    Self {
      refresh_interval: DEFAULT_REFRESH_INTERVAL,
      min_refresh_interval: MIN_REFRESH_INTERVAL,
    }
  }
}

impl RefreshConfig {
  /// The floor a cache built from this config applies to its interval.
  pub fn effective_min_interval(&self) -> Duration {
    self.min_refresh_interval.max(MIN_CONFIGURABLE_REFRESH_INTERVAL)
  }

  /// The interval a cache built from this config will actually use.
  pub fn effective_interval(&self) -> Duration {
    clamp_interval(self.refresh_interval, self.effective_min_interval())
  }
}

pub(crate) fn clamp_interval(requested: Duration, minimum: Duration) -> Duration {
  if requested <= minimum {
    minimum
  } else {
    requested
  }
}

#[cfg(feature = "serde")]
mod humantime_duration {
  use std::time::Duration;

  use serde::{de, Deserialize, Deserializer, Serializer};

  pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&humantime::format_duration(*value))
  }

  pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn interval_at_minimum_is_kept_at_minimum() {
    assert_eq!(clamp_interval(MIN_REFRESH_INTERVAL, MIN_REFRESH_INTERVAL), MIN_REFRESH_INTERVAL);
  }

  #[test]
  fn short_interval_is_raised() {
    assert_eq!(
      clamp_interval(Duration::from_secs(5), MIN_REFRESH_INTERVAL),
      MIN_REFRESH_INTERVAL
    );
    assert_eq!(clamp_interval(Duration::ZERO, MIN_REFRESH_INTERVAL), MIN_REFRESH_INTERVAL);
  }

  #[test]
  fn long_interval_is_kept() {
    let hour = Duration::from_secs(3600);
    assert_eq!(clamp_interval(hour, MIN_REFRESH_INTERVAL), hour);
  }

  #[test]
  fn zero_config_is_bounded() {
    let config = RefreshConfig {
      refresh_interval: Duration::ZERO,
      min_refresh_interval: Duration::ZERO,
    };
    assert_eq!(config.effective_min_interval(), MIN_CONFIGURABLE_REFRESH_INTERVAL);
    assert_eq!(config.effective_interval(), MIN_CONFIGURABLE_REFRESH_INTERVAL);
  }

  #[test]
  fn huge_interval_is_kept() {
    assert_eq!(clamp_interval(Duration::MAX, MIN_REFRESH_INTERVAL), Duration::MAX);
  }

  #[test]
  fn default_config_uses_default_interval() {
    assert_eq!(RefreshConfig::default().effective_interval(), DEFAULT_REFRESH_INTERVAL);
  }
}
