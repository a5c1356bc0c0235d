use std::time::Duration;

use serde::Deserialize;

use super::helpers::{deserialize_duration_from_ms, deserialize_duration_from_seconds};

/// Provides the default maximum number of retries.
fn default_max_attempts() -> u32 {
    3
}

/// Provides the default initial backoff duration.
fn default_initial_backoff_ms() -> Duration {
    Duration::from_millis(250)
}

/// Provides the default maximum backoff duration.
fn default_max_backoff_secs() -> Duration {
    Duration::from_secs(10)
}

/// Provides the default exponential base for backoff calculations.
fn default_base_for_backoff() -> u32 {
    2
}

/// Jitter setting for retry policies.
#[derive(Default, Debug, Clone, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JitterSetting {
    /// No jitter applied to the backoff duration
    None,
    /// Full jitter applied, randomizing the backoff duration
    #[default]
    Full,
}

/// Configuration for HTTP retry policies applied to every REST client.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Hash)]
pub struct HttpRetryConfig {
    /// Maximum number of retries for transient errors
    #[serde(default = "default_max_attempts")]
    pub max_retries: u32,
    /// Base duration for exponential backoff calculations
    #[serde(default = "default_base_for_backoff")]
    pub base_for_backoff: u32,
    /// Initial backoff duration before the first retry
    #[serde(
        default = "default_initial_backoff_ms",
        deserialize_with = "deserialize_duration_from_ms"
    )]
    pub initial_backoff_ms: Duration,
    /// Maximum backoff duration for retries
    #[serde(
        default = "default_max_backoff_secs",
        deserialize_with = "deserialize_duration_from_seconds"
    )]
    pub max_backoff_secs: Duration,
    /// Jitter to apply to the backoff duration
    #[serde(default)]
    pub jitter: JitterSetting,
}

impl Default for HttpRetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_attempts(),
            base_for_backoff: default_base_for_backoff(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_secs: default_max_backoff_secs(),
            jitter: JitterSetting::default(),
        }
    }
}
