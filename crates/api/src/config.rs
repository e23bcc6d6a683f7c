//! Process configuration, read once at startup.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use awap_auth::{HashCost, SessionSecret};

const DEV_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub session_secret: SessionSecret,
    pub bind_addr: SocketAddr,
    /// `None` runs against in-memory stores.
    pub database_url: Option<String>,
    pub session_ttl: chrono::Duration,
    pub hash_cost: HashCost,
    pub store_timeout: Duration,
    pub request_timeout: Duration,
    pub seed_dev_users: bool,
    /// Send the session cookie only over HTTPS.
    pub secure_cookies: bool,
}

impl AppConfig {
    /// Read `AWAP_*` and `DATABASE_URL` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let session_secret = match get("AWAP_SESSION_SECRET") {
            Some(secret) => SessionSecret::new(secret),
            None => {
                tracing::warn!("AWAP_SESSION_SECRET not set; using insecure dev default");
                SessionSecret::new(DEV_SECRET)
            }
        };

        let bind_addr = parse(&get, "AWAP_BIND_ADDR", "0.0.0.0:8080".parse::<SocketAddr>())?;
        let ttl_secs: i64 = parse(&get, "AWAP_SESSION_TTL_SECS", Ok(30 * 24 * 60 * 60))?;
        let iterations: u32 = parse(&get, "AWAP_HASH_COST", Ok(2))?;
        let store_timeout_ms: u64 = parse(&get, "AWAP_STORE_TIMEOUT_MS", Ok(5_000))?;
        let request_timeout_secs: u64 = parse(&get, "AWAP_REQUEST_TIMEOUT_SECS", Ok(30))?;
        let seed_dev_users: bool = parse(&get, "AWAP_SEED_DEV_USERS", Ok(false))?;
        let secure_cookies: bool = parse(&get, "AWAP_SECURE_COOKIES", Ok(false))?;

        if ttl_secs <= 0 {
            return Err(invalid("AWAP_SESSION_TTL_SECS", ttl_secs, "must be positive"));
        }
        if iterations == 0 {
            return Err(invalid("AWAP_HASH_COST", iterations, "must be at least 1"));
        }

        Ok(Self {
            session_secret,
            bind_addr,
            database_url: get("DATABASE_URL"),
            session_ttl: chrono::Duration::seconds(ttl_secs),
            hash_cost: HashCost::new(iterations),
            store_timeout: Duration::from_millis(store_timeout_ms),
            request_timeout: Duration::from_secs(request_timeout_secs),
            seed_dev_users,
            secure_cookies,
        })
    }

    /// In-memory stores, seeded dev users, cheap hashing.
    pub fn for_tests(secret: &str) -> Self {
        Self {
            session_secret: SessionSecret::new(secret),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_url: None,
            session_ttl: chrono::Duration::hours(1),
            hash_cost: HashCost::new(1).with_memory_kib(64),
            store_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
            seed_dev_users: true,
            secure_cookies: false,
        }
    }
}

fn parse<T, G>(get: &G, key: &'static str, default: Result<T, T::Err>) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            value: raw,
            reason: e.to_string(),
        }),
        None => default.map_err(|e| ConfigError::Invalid {
            key,
            value: String::new(),
            reason: e.to_string(),
        }),
    }
}

fn invalid(key: &'static str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.session_ttl, chrono::Duration::days(30));
        assert_eq!(cfg.hash_cost.iterations, 2);
        assert_eq!(cfg.store_timeout, Duration::from_millis(5_000));
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert!(!cfg.seed_dev_users);
        assert!(!cfg.secure_cookies);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = config(&[
            ("AWAP_BIND_ADDR", "127.0.0.1:9000"),
            ("DATABASE_URL", "postgres://localhost/awap"),
            ("AWAP_SESSION_TTL_SECS", "3600"),
            ("AWAP_HASH_COST", "3"),
            ("AWAP_SEED_DEV_USERS", "true"),
            ("AWAP_SECURE_COOKIES", "true"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/awap"));
        assert_eq!(cfg.session_ttl, chrono::Duration::hours(1));
        assert_eq!(cfg.hash_cost.iterations, 3);
        assert!(cfg.seed_dev_users);
        assert!(cfg.secure_cookies);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config(&[("DATABASE_URL", "  ")]).unwrap();
        assert_eq!(cfg.database_url, None);
    }

    #[test]
    fn malformed_values_are_reported() {
        assert!(matches!(
            config(&[("AWAP_HASH_COST", "lots")]),
            Err(ConfigError::Invalid { key: "AWAP_HASH_COST", .. })
        ));
        assert!(matches!(
            config(&[("AWAP_HASH_COST", "0")]),
            Err(ConfigError::Invalid { key: "AWAP_HASH_COST", .. })
        ));
        assert!(matches!(
            config(&[("AWAP_SESSION_TTL_SECS", "-5")]),
            Err(ConfigError::Invalid { key: "AWAP_SESSION_TTL_SECS", .. })
        ));
    }
}
