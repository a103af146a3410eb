//! Configuration Module
//!
//! Handles loading server configuration and TTL tiers from environment
//! variables.

use std::env;
use std::time::Duration;

use crate::cache::Ttl;

// == TTL Tiers ==
/// Named expiration tiers supplied by configuration.
///
/// The cache core treats TTLs as opaque durations; the tiers only exist so
/// callers size expirations consistently.
#[derive(Debug, Clone, Copy)]
pub struct TtlTiers {
    /// Volatile data (default 60s)
    pub short: Duration,
    /// Typical request-scoped data (default 300s)
    pub medium: Duration,
    /// Slow-changing data (default 1h)
    pub long: Duration,
    /// Reference data that rarely changes (default 24h)
    pub reference: Duration,
}

impl TtlTiers {
    /// Resolves a tier by name, with `"never"` mapping to the never-expire
    /// sentinel.
    pub fn resolve(&self, name: &str) -> Option<Ttl> {
        match name {
            "short" => Some(Ttl::After(self.short)),
            "medium" => Some(Ttl::After(self.medium)),
            "long" => Some(Ttl::After(self.long)),
            "reference" => Some(Ttl::After(self.reference)),
            "never" => Some(Ttl::Never),
            _ => None,
        }
    }

    /// The tier used when a request does not specify one.
    pub fn default_ttl(&self) -> Ttl {
        Ttl::After(self.medium)
    }
}

impl Default for TtlTiers {
    fn default() -> Self {
        Self {
            short: Duration::from_secs(60),
            medium: Duration::from_secs(300),
            long: Duration::from_secs(3600),
            reference: Duration::from_secs(86400),
        }
    }
}

// == Config ==
/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub sweep_interval: u64,
    /// TTL tier durations
    pub tiers: TtlTiers,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Expiry sweep frequency in seconds (default: 5)
    /// - `TTL_SHORT` / `TTL_MEDIUM` / `TTL_LONG` / `TTL_REFERENCE` - tier
    ///   durations in seconds (defaults: 60 / 300 / 3600 / 86400)
    pub fn from_env() -> Self {
        let defaults = TtlTiers::default();
        Self {
            server_port: env_or("SERVER_PORT", 3000),
            sweep_interval: env_or("SWEEP_INTERVAL", 5),
            tiers: TtlTiers {
                short: Duration::from_secs(env_or("TTL_SHORT", defaults.short.as_secs())),
                medium: Duration::from_secs(env_or("TTL_MEDIUM", defaults.medium.as_secs())),
                long: Duration::from_secs(env_or("TTL_LONG", defaults.long.as_secs())),
                reference: Duration::from_secs(env_or(
                    "TTL_REFERENCE",
                    defaults.reference.as_secs(),
                )),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            sweep_interval: 5,
            tiers: TtlTiers::default(),
        }
    }
}

/// Parses an environment variable, falling back to a default.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_interval, 5);
        assert_eq!(config.tiers.medium, Duration::from_secs(300));
    }

    #[test]
    fn test_config_from_env_defaults() {
        env::remove_var("SERVER_PORT");
        env::remove_var("SWEEP_INTERVAL");
        env::remove_var("TTL_SHORT");
        env::remove_var("TTL_MEDIUM");
        env::remove_var("TTL_LONG");
        env::remove_var("TTL_REFERENCE");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_interval, 5);
        assert_eq!(config.tiers.short, Duration::from_secs(60));
        assert_eq!(config.tiers.reference, Duration::from_secs(86400));
    }

    #[test]
    fn test_tier_resolution() {
        let tiers = TtlTiers::default();

        assert_eq!(
            tiers.resolve("short"),
            Some(Ttl::After(Duration::from_secs(60)))
        );
        assert_eq!(
            tiers.resolve("long"),
            Some(Ttl::After(Duration::from_secs(3600)))
        );
        assert_eq!(tiers.resolve("never"), Some(Ttl::Never));
        assert_eq!(tiers.resolve("bogus"), None);
    }

    #[test]
    fn test_default_ttl_is_medium() {
        let tiers = TtlTiers::default();
        assert_eq!(tiers.default_ttl(), Ttl::After(tiers.medium));
    }
}
