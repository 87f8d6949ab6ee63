//! Runtime configuration types for operational parameters
//!
//! These types define configuration that controls runtime behavior like
//! the listen address, TLS material, upstream API access, network timeouts
//! and log output.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// GitHub API settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Network and HTTP client configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfig {
    /// Listen address, either `host:port` or `:port`
    #[serde(default = "default_listen")]
    pub listen: String,

    /// PEM certificate chain served over TLS
    #[serde(default = "default_cert_file")]
    pub cert_file: Utf8PathBuf,

    /// PEM private key matching `cert_file`
    #[serde(default = "default_key_file")]
    pub key_file: Utf8PathBuf,

    /// Serve HTTPS (plaintext when false)
    #[serde(default = "default_tls")]
    pub tls: bool,

    /// Upper bound for a whole resolution, 0 disables it
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Listen address with a bare `:port` expanded to all interfaces
    pub fn listen_addr(&self) -> String {
        if self.listen.starts_with(':') {
            format!("0.0.0.0{}", self.listen)
        } else {
            self.listen.clone()
        }
    }

    /// Per-request deadline, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            cert_file: default_cert_file(),
            key_file: default_key_file(),
            tls: default_tls(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_listen() -> String {
    ":8081".to_string()
}
fn default_cert_file() -> Utf8PathBuf {
    Utf8PathBuf::from("server.crt")
}
fn default_key_file() -> Utf8PathBuf {
    Utf8PathBuf::from("server.key")
}
fn default_tls() -> bool {
    true
}
fn default_request_timeout() -> u64 {
    60
}

/// GitHub API configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// REST API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Token sent as a bearer credential to the API (never to asset downloads)
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Value of the `X-GitHub-Api-Version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            api_version: default_api_version(),
        }
    }
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_version", &self.api_version)
            .finish()
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_api_version() -> String {
    "2022-11-28".to_string()
}

/// Network and HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Total timeout for each upstream request, checksum downloads included
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// TCP/TLS connect timeout
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl NetworkConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_http_timeout() -> u64 {
    30
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_user_agent() -> String {
    format!(
        "lxdrelay/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}' (expected text or json)", other)),
        }
    }
}
