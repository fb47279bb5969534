use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};

use ringside_psa::PsaClientOptions;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub psa: PsaSettings,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Build the configuration from `RINGSIDE_*` environment variables.
    ///
    /// Unset variables keep their defaults; a variable that is set but
    /// unparseable is a configuration error, not a silent fallback.
    pub fn from_env() -> Result<Self, String> {
        let mut cfg = Self::default();
        if let Some(host) = read_env("RINGSIDE_HOST")? {
            cfg.server.host = host;
        }
        if let Some(port) = parse_env("RINGSIDE_PORT")? {
            cfg.server.port = port;
        }
        if let Some(ttl) = parse_env("RINGSIDE_CACHE_TTL")? {
            cfg.cache.ttl_seconds = ttl;
        }
        if let Some(retries) = parse_env("RINGSIDE_MAX_RETRIES")? {
            cfg.psa.max_retries = retries;
        }
        if let Some(timeout) = parse_env("RINGSIDE_TIMEOUT_MS")? {
            cfg.psa.timeout_ms = timeout;
        }
        if let Some(secret) = read_env("RINGSIDE_WEBHOOK_SECRET")? {
            cfg.webhook.shared_secret = secret;
        }
        if let Some(level) = read_env("RINGSIDE_LOG_LEVEL")? {
            cfg.logging.level = level;
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.cache.ttl_seconds <= 0 {
            return Err("cache.ttl_seconds must be > 0".into());
        }
        if self.psa.max_retries == 0 {
            return Err("psa.max_retries must be >= 1".into());
        }
        if self.psa.timeout_ms == 0 {
            return Err("psa.timeout_ms must be > 0".into());
        }
        if self.webhook.shared_secret.trim().is_empty() {
            return Err("webhook.shared_secret is required (RINGSIDE_WEBHOOK_SECRET)".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Positive-cache lifetime, seconds. The negative-cache lifetime is
    /// fixed at 300 s and not configurable.
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsaSettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for PsaSettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl PsaSettings {
    pub fn client_options(&self) -> PsaClientOptions {
        PsaClientOptions {
            max_retries: self.max_retries,
            timeout: Duration::from_millis(self.timeout_ms),
            ..PsaClientOptions::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WebhookConfig {
    /// Shared secret the PSA presents in `X-Webhook-Secret`.
    #[serde(default)]
    pub shared_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_cache_ttl() -> i64 {
    3600
}
fn default_max_retries() -> u32 {
    3
}
fn default_timeout_ms() -> u64 {
    5000
}
fn default_log_level() -> String {
    "info".to_string()
}

fn read_env(name: &str) -> Result<Option<String>, String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(Some(v)),
        Ok(_) | Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(format!("failed to read {name}: {e}")),
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>, String>
where
    T::Err: std::fmt::Display,
{
    match read_env(name)? {
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("invalid {name}: {e}")),
        None => Ok(None),
    }
}
