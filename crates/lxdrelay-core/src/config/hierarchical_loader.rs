//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Config file (`<config dir>/lxdrelay.yaml`, or an explicit path)
//! 3. Environment variables (LXDRELAY_* prefix, plus GITHUB_TOKEN)
//! 4. CLI flags (handled by caller)
//!
//! Files are merged key by key onto the embedded defaults, so a file that only
//! sets `server.listen` keeps every other default.

use crate::error::{Error, Result};
use crate::types::{LogFormat, RuntimeConfig};
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use std::str::FromStr;
use tracing::debug;

/// Config directory used when `LXDRELAY_CONFIG_DIR` is unset
pub const DEFAULT_CONFIG_DIR: &str = "/etc/lxdrelay";

/// File looked up inside the config directory
pub const CONFIG_FILE_NAME: &str = "lxdrelay.yaml";

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl HierarchicalConfigLoader {
    /// Create a loader rooted at `LXDRELAY_CONFIG_DIR` or [`DEFAULT_CONFIG_DIR`]
    pub fn new() -> Self {
        let config_dir = env::var("LXDRELAY_CONFIG_DIR")
            .map(Utf8PathBuf::from)
            .unwrap_or_else(|_| Utf8PathBuf::from(DEFAULT_CONFIG_DIR));
        Self { config_dir }
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Load runtime configuration, picking up `<config dir>/lxdrelay.yaml` if present
    pub fn load_runtime_config(&self) -> Result<RuntimeConfig> {
        let mut value = Self::load_embedded_defaults()?;

        let config_path = self.config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            debug!("Loading configuration from {}", config_path);
            merge_values(&mut value, Self::load_yaml_file(&config_path)?);
        }

        self.finish(value)
    }

    /// Load runtime configuration from an explicit file, which must exist
    pub fn load_runtime_config_from(&self, path: &Utf8Path) -> Result<RuntimeConfig> {
        if !path.exists() {
            return Err(Error::config_not_found(path.as_str()));
        }

        let mut value = Self::load_embedded_defaults()?;
        debug!("Loading configuration from {}", path);
        merge_values(&mut value, Self::load_yaml_file(path)?);

        self.finish(value)
    }

    fn finish(&self, value: Value) -> Result<RuntimeConfig> {
        let config: RuntimeConfig = serde_yaml_ng::from_value(value)
            .map_err(|e| Error::invalid_config(format!("Failed to parse configuration: {}", e)))?;
        self.apply_env_overrides(config)
    }

    /// Load the embedded defaults as an untyped tree
    fn load_embedded_defaults() -> Result<Value> {
        let filename = "runtime-defaults.yaml";
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    /// Load a YAML file as an untyped tree
    fn load_yaml_file(path: &Utf8Path) -> Result<Value> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(&self, mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("LXDRELAY_LISTEN") {
            config.server.listen = val;
        }

        if let Ok(val) = env::var("LXDRELAY_CERT_FILE") {
            config.server.cert_file = Utf8PathBuf::from(val);
        }

        if let Ok(val) = env::var("LXDRELAY_KEY_FILE") {
            config.server.key_file = Utf8PathBuf::from(val);
        }

        if let Some(tls) = parse_env::<bool>("LXDRELAY_TLS")? {
            config.server.tls = tls;
        }

        if let Some(secs) = parse_env::<u64>("LXDRELAY_REQUEST_TIMEOUT_SECS")? {
            config.server.request_timeout_secs = secs;
        }

        // GitHub configuration
        if let Ok(val) = env::var("LXDRELAY_GITHUB_API_URL") {
            config.github.api_url = val;
        }

        if let Some(token) = env::var("LXDRELAY_GITHUB_TOKEN")
            .or_else(|_| env::var("GITHUB_TOKEN"))
            .ok()
            .filter(|t| !t.trim().is_empty())
        {
            config.github.token = Some(token);
        }

        // Network timeouts
        if let Some(secs) = parse_env::<u64>("LXDRELAY_HTTP_TIMEOUT_SECS")? {
            config.network.http_timeout_secs = secs;
        }

        if let Some(secs) = parse_env::<u64>("LXDRELAY_CONNECT_TIMEOUT_SECS")? {
            config.network.connect_timeout_secs = secs;
        }

        // Logging
        if let Ok(val) = env::var("LXDRELAY_LOG_LEVEL") {
            config.logging.level = val;
        }

        if let Ok(val) = env::var("LXDRELAY_LOG_FORMAT") {
            config.logging.format = val.parse::<LogFormat>().map_err(Error::invalid_config)?;
        }

        Ok(config)
    }
}

impl Default for HierarchicalConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid_config(format!("{} has an invalid value: {}", name, val))),
        Err(_) => Ok(None),
    }
}

/// Deep-merge `overlay` onto `base`; mappings merge per key, anything else replaces
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_VARS: &[&str] = &[
        "LXDRELAY_LISTEN",
        "LXDRELAY_CERT_FILE",
        "LXDRELAY_KEY_FILE",
        "LXDRELAY_TLS",
        "LXDRELAY_REQUEST_TIMEOUT_SECS",
        "LXDRELAY_GITHUB_API_URL",
        "LXDRELAY_GITHUB_TOKEN",
        "GITHUB_TOKEN",
        "LXDRELAY_HTTP_TIMEOUT_SECS",
        "LXDRELAY_CONNECT_TIMEOUT_SECS",
        "LXDRELAY_LOG_LEVEL",
        "LXDRELAY_LOG_FORMAT",
    ];

    fn clear_env() {
        for name in ENV_VARS {
            env::remove_var(name);
        }
    }

    fn create_temp_loader() -> (HierarchicalConfigLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir =
            Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("Invalid UTF-8 path");
        let loader = HierarchicalConfigLoader::with_dir(config_dir);
        (loader, temp_dir)
    }

    #[test]
    #[serial]
    fn test_load_runtime_config_defaults() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.server.listen, ":8081");
        assert_eq!(config.server.cert_file, "server.crt");
        assert!(config.server.tls);
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert!(config.github.token.is_none());
        assert_eq!(config.network.http_timeout_secs, 30);
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    #[serial]
    fn test_partial_file_keeps_other_defaults() {
        clear_env();
        let (loader, _temp) = create_temp_loader();

        let config_content = r#"
server:
  listen: "127.0.0.1:8443"
network:
  http-timeout-secs: 5
"#;
        fs::write(loader.config_dir().join(CONFIG_FILE_NAME), config_content).unwrap();

        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.server.listen, "127.0.0.1:8443");
        assert_eq!(config.server.key_file, "server.key");
        assert_eq!(config.network.http_timeout_secs, 5);
        assert_eq!(config.network.connect_timeout_secs, 10);
    }

    #[test]
    #[serial]
    fn test_empty_file_is_ignored() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        fs::write(loader.config_dir().join(CONFIG_FILE_NAME), "").unwrap();

        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.server.listen, ":8081");
    }

    #[test]
    #[serial]
    fn test_explicit_file_must_exist() {
        clear_env();
        let (loader, temp) = create_temp_loader();
        let missing = Utf8PathBuf::from_path_buf(temp.path().join("nope.yaml")).unwrap();

        let err = loader.load_runtime_config_from(&missing).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    #[serial]
    fn test_invalid_file_is_rejected() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        fs::write(
            loader.config_dir().join(CONFIG_FILE_NAME),
            "server:\n  tls: sometimes\n",
        )
        .unwrap();

        let err = loader.load_runtime_config().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    #[serial]
    fn test_env_overrides_beat_file() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        fs::write(
            loader.config_dir().join(CONFIG_FILE_NAME),
            "server:\n  listen: \":9000\"\n",
        )
        .unwrap();

        env::set_var("LXDRELAY_LISTEN", ":9443");
        env::set_var("LXDRELAY_TLS", "false");
        env::set_var("GITHUB_TOKEN", "ghp_from_env");
        env::set_var("LXDRELAY_LOG_FORMAT", "json");

        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.server.listen, ":9443");
        assert!(!config.server.tls);
        assert_eq!(config.github.token.as_deref(), Some("ghp_from_env"));
        assert_eq!(config.logging.format, LogFormat::Json);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_env_number() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        env::set_var("LXDRELAY_HTTP_TIMEOUT_SECS", "soon");

        let err = loader.load_runtime_config().unwrap_err();
        assert!(err.to_string().contains("LXDRELAY_HTTP_TIMEOUT_SECS"));

        clear_env();
    }

    #[test]
    fn test_merge_values_replaces_scalars_and_merges_maps() {
        let mut base: Value = serde_yaml_ng::from_str("a: 1\nb:\n  c: 2\n  d: 3\n").unwrap();
        let overlay: Value = serde_yaml_ng::from_str("b:\n  d: 4\ne: 5\n").unwrap();
        merge_values(&mut base, overlay);

        let expected: Value =
            serde_yaml_ng::from_str("a: 1\nb:\n  c: 2\n  d: 4\ne: 5\n").unwrap();
        assert_eq!(base, expected);
    }
}
