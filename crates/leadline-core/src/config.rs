//! Pipeline configuration.
//!
//! Defaults match the production landing page. Every setting can be
//! overridden with a `LEADLINE_*` environment variable; unparseable values
//! fall back to the default.

use std::time::Duration;

use crate::rate_limit::{DEFAULT_MAX_SUBMISSIONS, DEFAULT_WINDOW, RateLimiter};

/// Default number of retries after the first insert attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default backoff unit; attempt `n` waits `n + 1` units.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Default origin tag written with every row.
pub const DEFAULT_ORIGIN: &str = "landing_v1";

/// Tunables for [`SubmissionPipeline`](crate::pipeline::SubmissionPipeline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Retries allowed after the first insert. Default: 3.
    pub max_retries: u32,
    /// Backoff unit. Default: 1 second.
    pub retry_base_delay: Duration,
    /// Rate-limit window. Default: 5 minutes.
    pub rate_limit_window: Duration,
    /// Successful submissions allowed per identity per window. Default: 5.
    pub rate_limit_max: u32,
    /// Tag identifying this client surface. Default: `landing_v1`.
    pub origin: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
            rate_limit_window: DEFAULT_WINDOW,
            rate_limit_max: DEFAULT_MAX_SUBMISSIONS,
            origin: DEFAULT_ORIGIN.to_owned(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    ///
    /// - `LEADLINE_MAX_RETRIES`: default `3`
    /// - `LEADLINE_RETRY_BASE_MS`: default `1000`
    /// - `LEADLINE_RATE_WINDOW_SECS`: default `300`
    /// - `LEADLINE_RATE_MAX`: default `5`
    /// - `LEADLINE_ORIGIN`: default `landing_v1`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, with the same keys
    /// and fallbacks as [`PipelineConfig::from_env`].
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let max_retries = parse("LEADLINE_MAX_RETRIES")
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(defaults.max_retries);

        let retry_base_delay = parse("LEADLINE_RETRY_BASE_MS")
            .filter(|ms| *ms > 0)
            .map_or(defaults.retry_base_delay, Duration::from_millis);

        let rate_limit_window = parse("LEADLINE_RATE_WINDOW_SECS")
            .filter(|secs| *secs > 0)
            .map_or(defaults.rate_limit_window, Duration::from_secs);

        let rate_limit_max = parse("LEADLINE_RATE_MAX")
            .filter(|max| *max > 0)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(defaults.rate_limit_max);

        let origin = lookup("LEADLINE_ORIGIN")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.origin);

        Self {
            max_retries,
            retry_base_delay,
            rate_limit_window,
            rate_limit_max,
            origin,
        }
    }

    /// A fresh limiter sized by this configuration.
    #[must_use]
    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.rate_limit_window, self.rate_limit_max)
    }
}

/// Delay before retrying after failed attempt `attempt` (zero-based).
#[must_use]
pub fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    base.saturating_mul(attempt.saturating_add(1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_landing_page() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.retry_base_delay, Duration::from_secs(1));
        assert_eq!(cfg.rate_limit_window, Duration::from_secs(300));
        assert_eq!(cfg.rate_limit_max, 5);
        assert_eq!(cfg.origin, "landing_v1");
    }

    #[test]
    fn backoff_grows_linearly() {
        let base = Duration::from_secs(1);
        assert_eq!(backoff_delay(0, base), Duration::from_secs(1));
        assert_eq!(backoff_delay(1, base), Duration::from_secs(2));
        assert_eq!(backoff_delay(2, base), Duration::from_secs(3));
    }

    #[test]
    fn backoff_saturates() {
        assert_eq!(backoff_delay(u32::MAX, Duration::MAX), Duration::MAX);
    }

    #[test]
    fn rate_limiter_uses_configured_window() {
        let cfg = PipelineConfig {
            rate_limit_window: Duration::from_secs(42),
            ..PipelineConfig::default()
        };
        assert_eq!(cfg.rate_limiter().window(), Duration::from_secs(42));
    }

    #[test]
    fn lookup_without_keys_yields_defaults() {
        let cfg = PipelineConfig::from_lookup(lookup_from(&[]));
        assert_eq!(cfg, PipelineConfig::default());
    }

    #[test]
    fn lookup_overrides_every_setting() {
        let cfg = PipelineConfig::from_lookup(lookup_from(&[
            ("LEADLINE_MAX_RETRIES", "0"),
            ("LEADLINE_RETRY_BASE_MS", " 250 "),
            ("LEADLINE_RATE_WINDOW_SECS", "60"),
            ("LEADLINE_RATE_MAX", "2"),
            ("LEADLINE_ORIGIN", "partner_page"),
        ]));
        assert_eq!(cfg.max_retries, 0);
        assert_eq!(cfg.retry_base_delay, Duration::from_millis(250));
        assert_eq!(cfg.rate_limit_window, Duration::from_secs(60));
        assert_eq!(cfg.rate_limit_max, 2);
        assert_eq!(cfg.origin, "partner_page");
    }

    #[test]
    fn unparseable_values_fall_back_to_defaults() {
        let cfg = PipelineConfig::from_lookup(lookup_from(&[
            ("LEADLINE_MAX_RETRIES", "three"),
            ("LEADLINE_RETRY_BASE_MS", "-5"),
            ("LEADLINE_RATE_WINDOW_SECS", "5m"),
            ("LEADLINE_RATE_MAX", "99999999999"),
            ("LEADLINE_ORIGIN", "   "),
        ]));
        assert_eq!(cfg, PipelineConfig::default());
    }

    #[test]
    fn zero_window_delay_and_max_fall_back_to_defaults() {
        let cfg = PipelineConfig::from_lookup(lookup_from(&[
            ("LEADLINE_RETRY_BASE_MS", "0"),
            ("LEADLINE_RATE_WINDOW_SECS", "0"),
            ("LEADLINE_RATE_MAX", "0"),
        ]));
        assert_eq!(cfg.retry_base_delay, DEFAULT_RETRY_BASE_DELAY);
        assert_eq!(cfg.rate_limit_window, Duration::from_secs(300));
        assert_eq!(cfg.rate_limit_max, 5);
    }
}
