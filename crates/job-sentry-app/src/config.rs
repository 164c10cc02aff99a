//! Environment-driven panel configuration.

use std::time::Duration;

use tracing::warn;

/// Scoring endpoint override.
pub const ENV_SCORING_ENDPOINT: &str = "JOB_SENTRY_SCORING_ENDPOINT";
/// Statistics document location override (URL or path).
pub const ENV_STATS_LOCATION: &str = "JOB_SENTRY_STATS_LOCATION";
/// Optional HTTP client timeout, in whole seconds; `0` disables it.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "JOB_SENTRY_HTTP_TIMEOUT_SECS";

/// Scoring endpoint used when no override is set.
pub const DEFAULT_SCORING_ENDPOINT: &str = "http://127.0.0.1:8000/predict";
/// Statistics document used when no override is set.
pub const DEFAULT_STATS_LOCATION: &str = "data/eda_data.json";

/// Runtime configuration for both pipelines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Absolute `http(s)` URL of the scoring endpoint.
    pub scoring_endpoint: String,
    /// `http(s)` URL or file path of the statistics document.
    pub stats_location: String,
    /// Timeout applied by the HTTP client; `None` waits until each call settles.
    pub http_timeout: Option<Duration>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            scoring_endpoint: DEFAULT_SCORING_ENDPOINT.to_string(),
            stats_location: DEFAULT_STATS_LOCATION.to_string(),
            http_timeout: None,
        }
    }
}

impl PanelConfig {
    /// Reads configuration from process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through a key lookup.
    ///
    /// Blank values count as unset. An unparsable timeout is ignored with a
    /// warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let http_timeout = match read(ENV_HTTP_TIMEOUT_SECS) {
            None => defaults.http_timeout,
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    warn!(
                        key = ENV_HTTP_TIMEOUT_SECS,
                        value = %raw,
                        "ignoring unparsable timeout"
                    );
                    defaults.http_timeout
                }
            },
        };

        Self {
            scoring_endpoint: read(ENV_SCORING_ENDPOINT).unwrap_or(defaults.scoring_endpoint),
            stats_location: read(ENV_STATS_LOCATION).unwrap_or(defaults.stats_location),
            http_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration lookup.

    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_values_use_defaults() {
        let config = PanelConfig::from_lookup(lookup_from(&[(ENV_SCORING_ENDPOINT, "  ")]));
        assert_eq!(config, PanelConfig::default());
    }

    #[test]
    fn overrides_and_bad_timeout() {
        let config = PanelConfig::from_lookup(lookup_from(&[
            (ENV_SCORING_ENDPOINT, "https://scoring.example.test/predict"),
            (ENV_STATS_LOCATION, "/srv/eda.json"),
            (ENV_HTTP_TIMEOUT_SECS, "soon"),
        ]));
        assert_eq!(config.scoring_endpoint, "https://scoring.example.test/predict");
        assert_eq!(config.stats_location, "/srv/eda.json");
        assert_eq!(config.http_timeout, None);
    }

    #[test]
    fn remote_calls_have_no_timeout_unless_configured() {
        assert_eq!(PanelConfig::default().http_timeout, None);

        let disabled = PanelConfig::from_lookup(lookup_from(&[(ENV_HTTP_TIMEOUT_SECS, "0")]));
        assert_eq!(disabled.http_timeout, None);

        let bounded = PanelConfig::from_lookup(lookup_from(&[(ENV_HTTP_TIMEOUT_SECS, "45")]));
        assert_eq!(bounded.http_timeout, Some(Duration::from_secs(45)));
    }
}
