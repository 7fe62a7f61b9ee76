//! Service configuration
//!
//! Every knob comes from an environment variable and falls back to a
//! default when absent or unparseable.

use crate::state_machine::{FlowSettings, FlowVariant};
use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DISCOUNT_PERCENT: u8 = 2;
const DEFAULT_LINK_DOMAIN: &str = "https://gifts.example.com";
const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;
const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Limits applied to the in-memory session store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLimits {
    /// Idle time after which a session is dropped (`None` = never)
    pub ttl: Option<Duration>,
    /// Maximum live sessions (`None` = unbounded)
    pub max_sessions: Option<usize>,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            ttl: Some(Duration::from_secs(DEFAULT_SESSION_TTL_SECS)),
            max_sessions: Some(DEFAULT_MAX_SESSIONS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub flow: FlowSettings,
    pub sessions: SessionLimits,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (tests pass a map here)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = parsed(&lookup, "GIFTFLOW_PORT").unwrap_or(DEFAULT_PORT);

        let variant = match lookup("GIFTFLOW_FLOW").as_deref().map(str::trim) {
            None | Some("" | "personal") => FlowVariant::Personal,
            Some("business") => FlowVariant::BusinessAware,
            Some(other) => {
                tracing::warn!(value = %other, "Unknown GIFTFLOW_FLOW, using personal");
                FlowVariant::Personal
            }
        };

        let discount_percent = match parsed::<u8>(&lookup, "GIFTFLOW_BULK_DISCOUNT_PERCENT") {
            None => DEFAULT_DISCOUNT_PERCENT,
            Some(p @ (1 | 2)) => p,
            Some(other) => {
                tracing::warn!(
                    value = other,
                    "Bulk discount must be 1 or 2 percent, using default"
                );
                DEFAULT_DISCOUNT_PERCENT
            }
        };

        let link_domain = lookup("GIFTFLOW_LINK_DOMAIN")
            .map(|d| d.trim().trim_end_matches('/').to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_LINK_DOMAIN.to_string());

        let ttl = match parsed::<u64>(&lookup, "GIFTFLOW_SESSION_TTL_SECS") {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Duration::from_secs(DEFAULT_SESSION_TTL_SECS)),
        };

        let max_sessions = match parsed::<usize>(&lookup, "GIFTFLOW_MAX_SESSIONS") {
            Some(0) => None,
            Some(n) => Some(n),
            None => Some(DEFAULT_MAX_SESSIONS),
        };

        Self {
            port,
            flow: FlowSettings {
                variant,
                discount_percent,
                link_domain,
            },
            sessions: SessionLimits { ttl, max_sessions },
        }
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable config value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.flow.variant, FlowVariant::Personal);
        assert_eq!(config.flow.discount_percent, 2);
        assert_eq!(config.flow.link_domain, "https://gifts.example.com");
        assert_eq!(config.sessions, SessionLimits::default());
    }

    #[test]
    fn test_business_flow_and_overrides() {
        let config = config_from(&[
            ("GIFTFLOW_PORT", "9100"),
            ("GIFTFLOW_FLOW", "business"),
            ("GIFTFLOW_BULK_DISCOUNT_PERCENT", "1"),
            ("GIFTFLOW_LINK_DOMAIN", "https://cards.test/"),
        ]);
        assert_eq!(config.port, 9100);
        assert_eq!(config.flow.variant, FlowVariant::BusinessAware);
        assert_eq!(config.flow.discount_percent, 1);
        assert_eq!(config.flow.link_domain, "https://cards.test");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("GIFTFLOW_PORT", "not-a-port"),
            ("GIFTFLOW_FLOW", "wholesale"),
            ("GIFTFLOW_BULK_DISCOUNT_PERCENT", "15"),
        ]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.flow.variant, FlowVariant::Personal);
        assert_eq!(config.flow.discount_percent, 2);
    }

    #[test]
    fn test_zero_disables_session_limits() {
        let config = config_from(&[
            ("GIFTFLOW_SESSION_TTL_SECS", "0"),
            ("GIFTFLOW_MAX_SESSIONS", "0"),
        ]);
        assert_eq!(config.sessions.ttl, None);
        assert_eq!(config.sessions.max_sessions, None);
    }
}
