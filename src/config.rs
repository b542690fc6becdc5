// src/config.rs

//! Manages server configuration: loading, defaults, and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_expires() -> Duration {
    Duration::from_secs(3600)
}

fn default_cache_file() -> String {
    "cache.json".to_string()
}

fn default_cache_flush_interval() -> Duration {
    Duration::from_secs(60)
}

/// Configuration for the response cache and its snapshot persistence.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CacheConfig {
    /// Whether successful responses are cached at all.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// How long a cached response stays fresh.
    #[serde(default = "default_cache_expires", with = "humantime_serde")]
    pub expires: Duration,
    /// Path of the JSON snapshot the cache is persisted to.
    #[serde(default = "default_cache_file")]
    pub file: String,
    /// How often the background task flushes dirty entries to disk.
    #[serde(default = "default_cache_flush_interval", with = "humantime_serde")]
    pub flush_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            expires: default_cache_expires(),
            file: default_cache_file(),
            flush_interval: default_cache_flush_interval(),
        }
    }
}

/// The top-level server configuration, usually loaded from `config.toml`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory served for the static landing page.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Development mode: verbose logging and full diagnostics for captured
    /// dispatch failures.
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            static_dir: default_static_dir(),
            debug: false,
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Loads and validates a configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(anyhow!("'host' must not be empty"));
        }
        if self.port == 0 {
            return Err(anyhow!("'port' must be a non-zero port number"));
        }
        if self.cache.expires.is_zero() {
            return Err(anyhow!("'cache.expires' must be a non-zero duration"));
        }
        if self.cache.flush_interval.is_zero() {
            return Err(anyhow!("'cache.flush_interval' must be a non-zero duration"));
        }
        if self.cache.file.is_empty() {
            return Err(anyhow!("'cache.file' must not be empty"));
        }
        Ok(())
    }
}
