//! Registry daemon configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Unset or unparsable values fall back to defaults.

use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::presence::DEFAULT_REF_BASELINE;

/// Log output format for the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Top-level registry configuration.
///
/// Loaded once at startup via [`RegistryConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Socket address of the admin HTTP/WebSocket surface.
    pub listen_addr: SocketAddr,

    /// Seconds between interval presence sweeps over all instances.
    pub client_poll_interval_secs: u64,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Strong references the registry itself holds on each registered
    /// node. A count above this means external clients exist.
    pub ref_baseline: usize,

    /// Log output format.
    pub log_format: LogFormat,
}

impl RegistryConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3100".to_string())
            .parse()?;

        let client_poll_interval_secs = parse_env::<u64>("CLIENT_POLL_INTERVAL_SECS", 5).max(1);
        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 1024);
        let ref_baseline = parse_env("REGISTRY_REF_BASELINE", DEFAULT_REF_BASELINE);

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            listen_addr,
            client_poll_interval_secs,
            event_bus_capacity,
            ref_baseline,
            log_format,
        })
    }

    /// Interval between presence sweeps.
    #[must_use]
    pub const fn client_poll_interval(&self) -> Duration {
        Duration::from_secs(self.client_poll_interval_secs)
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_falls_back_on_missing_key() {
        let value: u64 = parse_env("HWREGISTRY_TEST_SURELY_UNSET", 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn poll_interval_converts_seconds() {
        let config = RegistryConfig {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            client_poll_interval_secs: 5,
            event_bus_capacity: 16,
            ref_baseline: 1,
            log_format: LogFormat::Pretty,
        };
        assert_eq!(config.client_poll_interval(), Duration::from_secs(5));
    }
}
