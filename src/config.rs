//! Configuration Module
//!
//! Handles loading, defaulting and validating cache configuration.

use std::env;
use std::str::FromStr;

use crate::error::{CacheError, Result};

/// Default capacity bound.
pub const DEFAULT_MAX_ENTRIES: usize = 100;
/// Default entry lifetime (5 minutes).
pub const DEFAULT_TTL_MS: u64 = 300_000;
/// Default interval between expiry sweeps (1 minute).
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 60_000;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// TTL in milliseconds for entries stored without an explicit TTL
    pub default_ttl_ms: u64,
    /// Background sweep interval in milliseconds
    pub sweep_interval_ms: u64,
    /// Admin HTTP server port
    pub server_port: u16,
    /// Whether overwriting a live key on a full store still evicts the LRU entry
    pub evict_on_overwrite: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 100)
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 60000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `EVICT_ON_OVERWRITE` - `true`/`false` (default: true)
    ///
    /// Unparseable values fall back to the default; call [`Config::validate`]
    /// to reject degenerate ones.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_entries: parse_or(&lookup, "MAX_ENTRIES", defaults.max_entries),
            default_ttl_ms: parse_or(&lookup, "DEFAULT_TTL_MS", defaults.default_ttl_ms),
            sweep_interval_ms: parse_or(&lookup, "SWEEP_INTERVAL_MS", defaults.sweep_interval_ms),
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port),
            evict_on_overwrite: parse_or(
                &lookup,
                "EVICT_ON_OVERWRITE",
                defaults.evict_on_overwrite,
            ),
        }
    }

    /// Rejects values the store cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than zero".to_string(),
            ));
        }
        if self.default_ttl_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "default_ttl_ms must be greater than zero".to_string(),
            ));
        }
        if self.sweep_interval_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "sweep_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    // == Builder-style overrides ==
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_default_ttl_ms(mut self, default_ttl_ms: u64) -> Self {
        self.default_ttl_ms = default_ttl_ms;
        self
    }

    pub fn with_evict_on_overwrite(mut self, evict_on_overwrite: bool) -> Self {
        self.evict_on_overwrite = evict_on_overwrite;
        self
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl_ms: DEFAULT_TTL_MS,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
            server_port: 3000,
            evict_on_overwrite: true,
        }
    }
}
