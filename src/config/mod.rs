//! Configuration management for the adapter
//!
//! Loads configuration from adapter.config.json (or a YAML file). String
//! values of the form `$env:NAME` are replaced by the environment variable
//! before the document is parsed.

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_CACHE_SWEEP_INTERVAL_SECS, DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT,
    DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS, DEFAULT_UPSTREAM_TIMEOUT_SECS, ENV_VAR_PREFIX,
    MICROSOFT_AUTHORIZATION_ENDPOINT, MICROSOFT_ROUTE_PREFIX, MICROSOFT_TOKEN_ENDPOINT,
    MICROSOFT_USERINFO_ENDPOINT,
};
use crate::{AdapterError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::env;
use std::path::Path;
use std::time::Duration;
use url::Url;

static MICROSOFT_AUTHORIZATION_URL: Lazy<Url> = Lazy::new(|| {
    Url::parse(MICROSOFT_AUTHORIZATION_ENDPOINT).expect("valid Microsoft authorization URL")
});

static MICROSOFT_TOKEN_URL: Lazy<Url> =
    Lazy::new(|| Url::parse(MICROSOFT_TOKEN_ENDPOINT).expect("valid Microsoft token URL"));

static MICROSOFT_USERINFO_URL: Lazy<Url> =
    Lazy::new(|| Url::parse(MICROSOFT_USERINFO_ENDPOINT).expect("valid Microsoft userinfo URL"));

/// Complete adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Outbound client configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Profile cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,

    /// Upstream identity providers, one per route prefix
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Outbound HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamConfig {
    /// Total request timeout against the token endpoint
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,

    /// TCP/TLS connect timeout
    #[serde(default = "default_upstream_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_upstream_timeout(),
            connect_timeout_secs: default_upstream_connect_timeout(),
        }
    }
}

/// Profile cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    /// Seconds between background purges of expired entries (0 disables)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl CacheConfig {
    /// Sweep interval, or `None` when the sweep is disabled
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (debug, info, warn, error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Claim mapping used for a provider's ID tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Microsoft identity platform v2
    Microsoft,
    /// Plain OpenID Connect standard claims
    Oidc,
}

/// One upstream identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Claim mapping
    pub kind: ProviderKind,

    /// Path prefix the provider's routes live under (e.g. `/microsoft`)
    pub route_prefix: String,

    /// Upstream authorization endpoint
    pub authorization_endpoint: Url,

    /// Upstream token endpoint
    pub token_endpoint: Url,

    /// Upstream userinfo endpoint
    pub userinfo_endpoint: Url,
}

impl ProviderConfig {
    /// The built-in Microsoft identity platform provider (common tenant)
    pub fn microsoft() -> Self {
        Self {
            kind: ProviderKind::Microsoft,
            route_prefix: MICROSOFT_ROUTE_PREFIX.to_string(),
            authorization_endpoint: MICROSOFT_AUTHORIZATION_URL.clone(),
            token_endpoint: MICROSOFT_TOKEN_URL.clone(),
            userinfo_endpoint: MICROSOFT_USERINFO_URL.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        if normalize_route_prefix(&self.route_prefix).is_empty() {
            return Err(AdapterError::config(format!(
                "providers[].routePrefix cannot be empty (got '{}')",
                self.route_prefix
            )));
        }

        for (field, url) in [
            ("authorizationEndpoint", &self.authorization_endpoint),
            ("tokenEndpoint", &self.token_endpoint),
            ("userinfoEndpoint", &self.userinfo_endpoint),
        ] {
            if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
                return Err(AdapterError::config(format!(
                    "provider '{}': {} must be an absolute http(s) URL, got '{}'",
                    self.route_prefix, field, url
                )));
            }
        }

        Ok(())
    }
}

fn default_host() -> String {
    DEFAULT_HTTP_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_HTTP_PORT
}

fn default_upstream_timeout() -> u64 {
    DEFAULT_UPSTREAM_TIMEOUT_SECS
}

fn default_upstream_connect_timeout() -> u64 {
    DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS
}

fn default_sweep_interval() -> u64 {
    DEFAULT_CACHE_SWEEP_INTERVAL_SECS
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![ProviderConfig::microsoft()]
}

/// Normalize a route prefix to `/segment[/segment...]` without a trailing slash
pub fn normalize_route_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

impl Config {
    /// Load configuration from the default file in the working directory
    pub fn load() -> Result<Self> {
        Self::load_from_path(CONFIG_FILE_NAME)
    }

    /// Load configuration from specific path
    ///
    /// Supports both JSON and YAML formats based on file extension:
    /// - `.json` files are parsed as JSON
    /// - `.yaml` or `.yml` files are parsed as YAML
    /// - Files without extension default to JSON parsing
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;

        let mut raw: Value = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
                AdapterError::config(format!("Failed to parse YAML config: {}", e))
            })?,
            _ => serde_json::from_str(&content).map_err(|e| {
                AdapterError::config(format!("Failed to parse JSON config: {}", e))
            })?,
        };

        inject_env_vars(&mut raw);

        let mut config: Config = serde_json::from_value(raw)
            .map_err(|e| AdapterError::config(format!("Invalid config: {}", e)))?;
        config.normalize();
        config.validate()?;

        Ok(config)
    }

    /// Normalize provider route prefixes in place
    pub fn normalize(&mut self) {
        for provider in &mut self.providers {
            provider.route_prefix = normalize_route_prefix(&provider.route_prefix);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.http.port == 0 {
            return Err(AdapterError::config("http.port must be nonzero (1-65535)"));
        }

        if self.http.host.is_empty() {
            return Err(AdapterError::config("http.host cannot be empty"));
        }

        if self.upstream.timeout_secs == 0 {
            return Err(AdapterError::config("upstream.timeoutSecs must be nonzero"));
        }

        if self.providers.is_empty() {
            return Err(AdapterError::config(
                "at least one provider must be configured",
            ));
        }

        let mut seen = HashSet::new();
        for provider in &self.providers {
            provider.validate()?;

            let key = normalize_route_prefix(&provider.route_prefix).to_ascii_lowercase();
            if !seen.insert(key) {
                return Err(AdapterError::config(format!(
                    "duplicate provider routePrefix '{}'",
                    provider.route_prefix
                )));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            upstream: UpstreamConfig::default(),
            cache: CacheConfig::default(),
            log: None,
            providers: default_providers(),
        }
    }
}

/// Expand a `$env:NAME` value; unset variables leave the value unchanged
pub fn expand_env_value(value: &str) -> String {
    match value.strip_prefix(ENV_VAR_PREFIX) {
        Some(var_name) => env::var(var_name).unwrap_or_else(|_| value.to_string()),
        None => value.to_string(),
    }
}

/// Recursively expand `$env:` references in every string of a JSON document
pub fn inject_env_vars(value: &mut Value) {
    match value {
        Value::String(s) if s.starts_with(ENV_VAR_PREFIX) => {
            let expanded = expand_env_value(s);
            *s = expanded;
        }
        Value::Array(items) => items.iter_mut().for_each(inject_env_vars),
        Value::Object(map) => map.values_mut().for_each(inject_env_vars),
        _ => {}
    }
}

#[cfg(test)]
mod config_test;
