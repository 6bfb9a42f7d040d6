use std::time::Duration;

use crate::upstream::{DEFAULT_STATS_API_TIMEOUT_SECS, DEFAULT_STATS_API_URL};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub stats_api_url: String,
    pub stats_api_timeout: Duration,
    pub cors_allow_any: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let timeout_secs = non_empty("STATS_API_TIMEOUT_SECS")
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_STATS_API_TIMEOUT_SECS);

        let cors_allow_any = non_empty("CORS_ALLOW_ANY")
            .map(|raw| !matches!(raw.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Self {
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            stats_api_url: non_empty("STATS_API_URL")
                .unwrap_or_else(|| DEFAULT_STATS_API_URL.to_string()),
            stats_api_timeout: Duration::from_secs(timeout_secs),
            cors_allow_any,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.stats_api_url, DEFAULT_STATS_API_URL);
        assert_eq!(config.stats_api_timeout, Duration::from_secs(DEFAULT_STATS_API_TIMEOUT_SECS));
        assert!(config.cors_allow_any);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("STATS_API_URL", "http://stats.internal:8000"),
            ("STATS_API_TIMEOUT_SECS", "3"),
            ("CORS_ALLOW_ANY", "false"),
        ]);
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.stats_api_url, "http://stats.internal:8000");
        assert_eq!(config.stats_api_timeout, Duration::from_secs(3));
        assert!(!config.cors_allow_any);
    }

    #[test]
    fn ignores_zero_or_garbage_timeouts() {
        for raw in ["0", "soon", " "] {
            let config = config_from(&[("STATS_API_TIMEOUT_SECS", raw)]);
            assert_eq!(
                config.stats_api_timeout,
                Duration::from_secs(DEFAULT_STATS_API_TIMEOUT_SECS)
            );
        }
    }
}
