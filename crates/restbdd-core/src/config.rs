//! Process configuration for the harness
//!
//! Everything here is read once when the process starts and shared read-only
//! by every scenario afterwards.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HarnessError, HarnessResult};

/// Service the harness talks to unless `API_BASE_URI` says otherwise
pub const DEFAULT_BASE_URI: &str = "https://reqres.in/api";

/// Connect and request timeout, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Number of scenarios the runner executes concurrently
pub const DEFAULT_PARALLELISM: usize = 4;

static GLOBAL: OnceCell<Arc<HarnessConfig>> = OnceCell::new();

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Base URI every request path is resolved against
    #[serde(default = "default_base_uri")]
    pub base_uri: String,

    /// Applied as both connect timeout and overall request timeout
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Proxy host, only used together with `proxy_port`
    #[serde(default)]
    pub proxy_host: Option<String>,

    /// Raw proxy port; validated when a request specification is built
    #[serde(default)]
    pub proxy_port: Option<String>,

    /// Accept any TLS certificate from the service under test
    #[serde(default = "default_relaxed_https")]
    pub relaxed_https: bool,

    /// Maximum number of concurrently running scenarios
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Sent as `x-api-key` on every request when present
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_base_uri() -> String {
    DEFAULT_BASE_URI.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_millis(DEFAULT_TIMEOUT_MS)
}

fn default_relaxed_https() -> bool {
    true
}

fn default_parallelism() -> usize {
    DEFAULT_PARALLELISM
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_uri: default_base_uri(),
            timeout: default_timeout(),
            proxy_host: None,
            proxy_port: None,
            relaxed_https: default_relaxed_https(),
            parallelism: default_parallelism(),
            api_key: None,
        }
    }
}

/// A validated proxy endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    pub host: String,
    pub port: u16,
}

impl ProxySettings {
    /// Proxy URL in the form reqwest expects
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl HarnessConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_uri) = lookup("API_BASE_URI") {
            config.base_uri = base_uri;
        }

        if let Some(timeout) = lookup("API_TIMEOUT_MS") {
            match timeout.parse::<u64>() {
                Ok(ms) if ms > 0 => config.timeout = Duration::from_millis(ms),
                _ => warn!("Invalid API_TIMEOUT_MS value: {}", timeout),
            }
        }

        config.proxy_host = lookup("HTTP_PROXY_HOST");
        config.proxy_port = lookup("HTTP_PROXY_PORT");

        if let Some(relaxed) = lookup("API_RELAXED_HTTPS") {
            match restbdd_monitoring::parse_flag(&relaxed) {
                Some(enabled) => config.relaxed_https = enabled,
                None => warn!("Invalid API_RELAXED_HTTPS value: {}", relaxed),
            }
        }

        if let Some(parallelism) = lookup("BDD_PARALLELISM") {
            match parallelism.parse::<usize>() {
                Ok(n) if n > 0 => config.parallelism = n,
                _ => warn!("Invalid BDD_PARALLELISM value: {}", parallelism),
            }
        }

        if let Some(api_key) = lookup("API_KEY") {
            if !api_key.trim().is_empty() {
                config.api_key = Some(api_key);
            }
        }

        config
    }

    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }

    pub fn with_proxy(mut self, host: impl Into<String>, port: impl Into<String>) -> Self {
        self.proxy_host = Some(host.into());
        self.proxy_port = Some(port.into());
        self
    }

    /// The base URI, or a configuration error when it is blank
    pub fn require_base_uri(&self) -> HarnessResult<&str> {
        let base_uri = self.base_uri.trim();
        if base_uri.is_empty() {
            return Err(HarnessError::Configuration(
                "Base URI is not configured (set API_BASE_URI)".to_string(),
            ));
        }
        Ok(base_uri)
    }

    /// Resolve the proxy settings.
    ///
    /// A proxy is only used when both host and port are set. A port that is
    /// not a valid TCP port, or a blank host, is a configuration error.
    pub fn proxy(&self) -> HarnessResult<Option<ProxySettings>> {
        let (host, port) = match (&self.proxy_host, &self.proxy_port) {
            (Some(host), Some(port)) => (host, port),
            _ => return Ok(None),
        };

        if host.trim().is_empty() {
            return Err(HarnessError::Configuration(format!(
                "Proxy host must not be empty (port was '{}')",
                port
            )));
        }

        let port = port.trim().parse::<u16>().map_err(|_| {
            HarnessError::Configuration(format!(
                "Invalid proxy port '{}' for host '{}': expected a number between 0 and 65535",
                port, host
            ))
        })?;

        Ok(Some(ProxySettings {
            host: host.trim().to_string(),
            port,
        }))
    }
}

/// Install the process-wide configuration.
///
/// The first installed value wins; later calls get the existing one back.
pub fn install(config: HarnessConfig) -> Arc<HarnessConfig> {
    let mut installed = false;
    let config = GLOBAL
        .get_or_init(|| {
            installed = true;
            Arc::new(config)
        })
        .clone();

    if installed {
        info!(base_uri = %config.base_uri, parallelism = config.parallelism, "Harness configuration installed");
    } else {
        warn!("Harness configuration already installed, keeping the existing one");
    }
    config
}

/// The process-wide configuration, loaded from the environment on first use
pub fn global() -> Arc<HarnessConfig> {
    GLOBAL.get_or_init(|| Arc::new(HarnessConfig::load())).clone()
}
