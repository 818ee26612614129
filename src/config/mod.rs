//! Process configuration, read once from the environment at startup.
//!
//! An optional `.env` file in the working directory is loaded first, so
//! both cron-style invocations and the long-running listener can share one
//! file. Variable names map to fields by lower-casing (`ACCESS_KEY` →
//! `access_key`).

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::consts::{
    DEFAULT_NCP_API_URL, DEFAULT_POLL_TIMEOUT_SECS, DEFAULT_SERVERS, DEFAULT_TELEGRAM_API_URL,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// NCP API access key.
    pub access_key: String,

    /// NCP API secret key. Only ever used as the HMAC key.
    pub secret_key: String,

    pub telegram_bot_token: String,

    /// Chat that receives one-shot CLI notifications.
    pub telegram_chat_id: String,

    /// Chat for `send_test_message`.
    #[serde(default)]
    pub telegram_chat_test_id: Option<String>,

    #[serde(default = "default_ncp_api_url")]
    pub ncp_api_url: String,

    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,

    /// `alias=instance` pairs, e.g. `1=25741251,2=26055342`.
    #[serde(default = "default_servers")]
    pub servers: ServerMap,

    /// Holidays beyond the fixed-date ones (lunar and substitute days).
    #[serde(default)]
    pub extra_holidays: Vec<NaiveDate>,

    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Chats the listener accepts commands from. Empty accepts every chat.
    #[serde(default)]
    pub allowed_chat_ids: Vec<String>,
}

fn default_ncp_api_url() -> String {
    DEFAULT_NCP_API_URL.to_string()
}

fn default_telegram_api_url() -> String {
    DEFAULT_TELEGRAM_API_URL.to_string()
}

fn default_servers() -> ServerMap {
    // The default table is a compile-time constant and parses.
    DEFAULT_SERVERS
        .parse()
        .expect("DEFAULT_SERVERS is a valid server table")
}

fn default_poll_timeout_secs() -> u64 {
    DEFAULT_POLL_TIMEOUT_SECS
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        let config: Config = envy::from_env().context(
            "failed to load configuration from environment \
             (ACCESS_KEY, SECRET_KEY, TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID are required)",
        )?;
        config.validate()?;
        Ok(config)
    }

    /// Build from explicit `(NAME, value)` pairs instead of the process environment.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Config = envy::from_iter(vars).context("invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("ACCESS_KEY", &self.access_key),
            ("SECRET_KEY", &self.secret_key),
            ("TELEGRAM_BOT_TOKEN", &self.telegram_bot_token),
            ("TELEGRAM_CHAT_ID", &self.telegram_chat_id),
        ];
        let empty: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !empty.is_empty() {
            bail!("required environment variables are empty: {}", empty.join(", "));
        }
        Ok(())
    }
}

/// Ordered alias → instance identifier table.
///
/// Order is the configured order; it decides the order of `/allstart`,
/// `/allstop` and the one-shot CLI sweeps.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ServerMap(Vec<(String, String)>);

impl ServerMap {
    /// Instance identifier for an alias.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(a, _)| a == alias)
            .map(|(_, instance)| instance.as_str())
    }

    /// `(alias, instance)` pairs in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(a, i)| (a.as_str(), i.as_str()))
    }

    /// Instance identifiers in configured order.
    pub fn instances(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, i)| i.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for ServerMap {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut entries: Vec<(String, String)> = Vec::new();

        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (alias, instance) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("server entry '{pair}' is not alias=instance"))?;
            let (alias, instance) = (alias.trim(), instance.trim());

            if alias.is_empty() {
                bail!("server entry '{pair}' has an empty alias");
            }
            if instance.is_empty() || !instance.chars().all(|c| c.is_ascii_digit()) {
                bail!("server entry '{pair}': instance id must be numeric");
            }
            if entries.iter().any(|(a, _)| a == alias) {
                bail!("server alias '{alias}' is listed twice");
            }
            entries.push((alias.to_string(), instance.to_string()));
        }

        if entries.is_empty() {
            bail!("no servers configured");
        }
        Ok(Self(entries))
    }
}

impl TryFrom<String> for ServerMap {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for ServerMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.iter().map(|(a, i)| format!("{a}={i}")).collect();
        f.write_str(&pairs.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(extra: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut v: Vec<(String, String)> = [
            ("ACCESS_KEY", "access"),
            ("SECRET_KEY", "secret"),
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "-1001"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, val) in extra {
            v.retain(|(name, _)| name.as_str() != *k);
            v.push((k.to_string(), val.to_string()));
        }
        v
    }

    #[test]
    fn defaults_applied() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config.ncp_api_url, DEFAULT_NCP_API_URL);
        assert_eq!(config.telegram_api_url, DEFAULT_TELEGRAM_API_URL);
        assert_eq!(config.poll_timeout_secs, DEFAULT_POLL_TIMEOUT_SECS);
        assert!(config.telegram_chat_test_id.is_none());
        assert!(config.extra_holidays.is_empty());
        assert!(config.allowed_chat_ids.is_empty());
        assert_eq!(config.servers.resolve("1"), Some("25741251"));
        assert_eq!(config.servers.resolve("2"), Some("26055342"));
    }

    #[test]
    fn missing_required_fails() {
        let mut v = vars(&[]);
        v.retain(|(k, _)| k != "SECRET_KEY");
        let err = Config::from_vars(v).unwrap_err();
        assert!(format!("{err:#}").contains("secret_key"));
    }

    #[test]
    fn empty_required_fails() {
        let err = Config::from_vars(vars(&[("TELEGRAM_BOT_TOKEN", " ")])).unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn overrides_read() {
        let config = Config::from_vars(vars(&[
            ("SERVERS", "a=111, b=222"),
            ("NCP_API_URL", "http://localhost:8080"),
            ("TELEGRAM_CHAT_TEST_ID", "42"),
            ("EXTRA_HOLIDAYS", "2026-02-16,2026-02-17"),
            ("POLL_TIMEOUT_SECS", "5"),
            ("ALLOWED_CHAT_IDS", "-1001,42"),
        ]))
        .unwrap();
        assert_eq!(config.servers.to_string(), "a=111,b=222");
        assert_eq!(config.ncp_api_url, "http://localhost:8080");
        assert_eq!(config.telegram_chat_test_id.as_deref(), Some("42"));
        assert_eq!(
            config.extra_holidays,
            vec![
                NaiveDate::from_ymd_opt(2026, 2, 16).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 17).unwrap(),
            ]
        );
        assert_eq!(config.poll_timeout_secs, 5);
        assert_eq!(config.allowed_chat_ids, vec!["-1001", "42"]);
    }

    #[test]
    fn bad_server_table_fails() {
        assert!(Config::from_vars(vars(&[("SERVERS", "1=abc")])).is_err());
    }

    #[test]
    fn server_map_keeps_order() {
        let map: ServerMap = "2=200,1=100,10=1000".parse().unwrap();
        let aliases: Vec<&str> = map.iter().map(|(a, _)| a).collect();
        assert_eq!(aliases, vec!["2", "1", "10"]);
        let instances: Vec<&str> = map.instances().collect();
        assert_eq!(instances, vec!["200", "100", "1000"]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn server_map_rejects_bad_entries() {
        assert!("".parse::<ServerMap>().is_err());
        assert!(" , ".parse::<ServerMap>().is_err());
        assert!("1".parse::<ServerMap>().is_err());
        assert!("=100".parse::<ServerMap>().is_err());
        assert!("1=".parse::<ServerMap>().is_err());
        assert!("1=10a".parse::<ServerMap>().is_err());
        assert!("1=100,1=200".parse::<ServerMap>().is_err());
    }

    #[test]
    fn server_map_resolve_unknown() {
        let map: ServerMap = DEFAULT_SERVERS.parse().unwrap();
        assert!(map.resolve("3").is_none());
        assert!(map.resolve("25741251").is_none());
    }
}
