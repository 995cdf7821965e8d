//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::time::Duration;

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of responses the cache can hold
    pub cache_capacity: usize,
    /// Freshness lifetime in seconds for responses without a usable max-age
    pub default_max_age: u64,
    /// Port the forward proxy listens on
    pub proxy_port: u16,
    /// Port the admin API listens on
    pub admin_port: u16,
    /// Upper bound on a whole origin fetch in seconds, 0 = no limit
    pub origin_timeout: u64,
    /// Seconds a client gets to send its request head, 0 = no limit
    pub client_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cached responses (default: 10)
    /// - `DEFAULT_MAX_AGE` - Default freshness lifetime in seconds (default: 3600)
    /// - `PROXY_PORT` - Proxy listening port (default: 9210)
    /// - `ADMIN_PORT` - Admin API port (default: 3000)
    /// - `ORIGIN_TIMEOUT` - Origin fetch timeout in seconds (default: 30)
    /// - `CLIENT_TIMEOUT` - Client request head timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_capacity: parse_var("CACHE_CAPACITY")
                .filter(|v| *v > 0)
                .unwrap_or(defaults.cache_capacity),
            default_max_age: parse_var("DEFAULT_MAX_AGE")
                .filter(|v| *v > 0)
                .unwrap_or(defaults.default_max_age),
            proxy_port: parse_var("PROXY_PORT").unwrap_or(defaults.proxy_port),
            admin_port: parse_var("ADMIN_PORT").unwrap_or(defaults.admin_port),
            origin_timeout: parse_var("ORIGIN_TIMEOUT").unwrap_or(defaults.origin_timeout),
            client_timeout: parse_var("CLIENT_TIMEOUT").unwrap_or(defaults.client_timeout),
        }
    }

    /// Applies command-line overrides: `caching_proxy [port]`.
    ///
    /// An unparsable port argument is ignored.
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        if let Some(port) = args.into_iter().nth(1).and_then(|v| v.parse().ok()) {
            self.proxy_port = port;
        }
        self
    }

    /// Origin timeout as a Duration, None when disabled.
    pub fn origin_timeout(&self) -> Option<Duration> {
        (self.origin_timeout > 0).then(|| Duration::from_secs(self.origin_timeout))
    }

    /// Client head timeout as a Duration, None when disabled.
    ///
    /// Connections are served one at a time, so this bounds how long a
    /// silent client can hold up the others.
    pub fn client_timeout(&self) -> Option<Duration> {
        (self.client_timeout > 0).then(|| Duration::from_secs(self.client_timeout))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 10,
            default_max_age: 3600,
            proxy_port: 9210,
            admin_port: 3000,
            origin_timeout: 30,
            client_timeout: 10,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_capacity, 10);
        assert_eq!(config.default_max_age, 3600);
        assert_eq!(config.proxy_port, 9210);
        assert_eq!(config.admin_port, 3000);
        assert_eq!(config.origin_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.client_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("DEFAULT_MAX_AGE");
        env::remove_var("PROXY_PORT");
        env::remove_var("ADMIN_PORT");
        env::remove_var("ORIGIN_TIMEOUT");
        env::remove_var("CLIENT_TIMEOUT");

        let config = Config::from_env();
        assert_eq!(config.cache_capacity, 10);
        assert_eq!(config.default_max_age, 3600);
        assert_eq!(config.proxy_port, 9210);
        assert_eq!(config.admin_port, 3000);
        assert_eq!(config.origin_timeout, 30);
        assert_eq!(config.client_timeout, 10);
    }

    #[test]
    fn test_port_argument_overrides() {
        let args = vec!["caching_proxy".to_string(), "8081".to_string()];
        let config = Config::default().with_args(args);
        assert_eq!(config.proxy_port, 8081);
    }

    #[test]
    fn test_invalid_port_argument_ignored() {
        let args = vec!["caching_proxy".to_string(), "not-a-port".to_string()];
        let config = Config::default().with_args(args);
        assert_eq!(config.proxy_port, 9210);
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = Config {
            origin_timeout: 0,
            client_timeout: 0,
            ..Config::default()
        };
        assert!(config.origin_timeout().is_none());
        assert!(config.client_timeout().is_none());
    }
}
