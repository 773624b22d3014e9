//! Client configuration.
//!
//! Values come from code or from the environment:
//! - `OBSERVER_API_URL`: base URL of the API (required)
//! - `OBSERVER_API_TIMEOUT_SECS`: transport timeout in whole seconds, at
//!   least 1 (default 30)

use std::time::Duration;

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "OBSERVER_API_URL";
pub const TIMEOUT_VAR: &str = "OBSERVER_API_TIMEOUT_SECS";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("observer-core/", env!("CARGO_PKG_VERSION"));

/// Settings shared by the request builder and the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing(BASE_URL_VAR))?;
        let mut config = Self::new(base_url);

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    name: TIMEOUT_VAR,
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn base_url_is_required() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(BASE_URL_VAR)));
    }

    #[test]
    fn timeout_defaults_to_thirty_seconds() {
        let config = ClientConfig::from_lookup(lookup(&[(BASE_URL_VAR, "http://api")])).unwrap();
        assert_eq!(config.base_url, "http://api");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("observer-core/"));
    }

    #[test]
    fn timeout_is_read_from_env() {
        let config =
            ClientConfig::from_lookup(lookup(&[(BASE_URL_VAR, "http://api"), (TIMEOUT_VAR, "5")]))
                .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://api"),
            (TIMEOUT_VAR, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: TIMEOUT_VAR, .. }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://api"),
            (TIMEOUT_VAR, "0"),
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for OBSERVER_API_TIMEOUT_SECS: 0"
        );
    }
}
