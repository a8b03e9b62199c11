//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// SQLite busy timeout, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "albums_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> String {
    "albums.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    albums_db::DbRuntimeSettings::default().busy_timeout_ms
}

fn default_pool_max_size() -> u32 {
    albums_db::DbRuntimeSettings::default().pool_max_size
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl DatabaseConfig {
    /// Pool tunables derived from this section.
    pub fn runtime_settings(&self) -> albums_db::DbRuntimeSettings {
        albums_db::DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `ALBUMS_HOST` overrides `server.host`
/// - `ALBUMS_PORT` overrides `server.port`
/// - `ALBUMS_DB_PATH` overrides `database.path`
/// - `ALBUMS_DB_BUSY_TIMEOUT_MS` overrides `database.busy_timeout_ms`
/// - `ALBUMS_DB_POOL_MAX_SIZE` overrides `database.pool_max_size`
/// - `ALBUMS_LOG_LEVEL` overrides `logging.level`
/// - `ALBUMS_LOG_JSON` overrides `logging.json` (set to "true" or "1" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

/// Applies `ALBUMS_*` overrides read through `lookup`.
///
/// Values that fail to parse are ignored and the existing setting is kept.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(host) = lookup("ALBUMS_HOST") {
        match host.parse() {
            Ok(parsed) => config.server.host = parsed,
            Err(_) => tracing::warn!(value = %host, "ignoring unparsable ALBUMS_HOST"),
        }
    }
    if let Some(port) = lookup("ALBUMS_PORT") {
        match port.parse() {
            Ok(parsed) => config.server.port = parsed,
            Err(_) => tracing::warn!(value = %port, "ignoring unparsable ALBUMS_PORT"),
        }
    }
    if let Some(db_path) = lookup("ALBUMS_DB_PATH") {
        config.database.path = db_path;
    }
    if let Some(timeout) = lookup("ALBUMS_DB_BUSY_TIMEOUT_MS") {
        match timeout.parse() {
            Ok(parsed) => config.database.busy_timeout_ms = parsed,
            Err(_) => {
                tracing::warn!(value = %timeout, "ignoring unparsable ALBUMS_DB_BUSY_TIMEOUT_MS")
            }
        }
    }
    if let Some(size) = lookup("ALBUMS_DB_POOL_MAX_SIZE") {
        match size.parse() {
            Ok(parsed) => config.database.pool_max_size = parsed,
            Err(_) => tracing::warn!(value = %size, "ignoring unparsable ALBUMS_DB_POOL_MAX_SIZE"),
        }
    }
    if let Some(level) = lookup("ALBUMS_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("ALBUMS_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_bind_all_interfaces_on_8080() {
        let config = Config::default();
        assert_eq!(config.server.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "albums.db");
        assert_eq!(config.database.busy_timeout_ms, 5_000);
        assert_eq!(config.database.pool_max_size, 8);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config(path.to_str()).expect("missing file is not an error");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9090\n\n[database]\npath = \"/var/lib/albums/albums.db\"\n",
        )
        .unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.database.path, "/var/lib/albums/albums.db");
        assert_eq!(config.database.pool_max_size, 8);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = \"not a port\"").unwrap();

        assert!(matches!(
            load_config(path.to_str()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("ALBUMS_HOST", "127.0.0.1"),
            ("ALBUMS_PORT", "3000"),
            ("ALBUMS_DB_PATH", ":memory:"),
            ("ALBUMS_DB_POOL_MAX_SIZE", "2"),
            ("ALBUMS_LOG_LEVEL", "debug"),
            ("ALBUMS_LOG_JSON", "1"),
        ]);
        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.path, ":memory:");
        assert_eq!(config.database.pool_max_size, 2);
        assert_eq!(config.database.busy_timeout_ms, 5_000);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn unparsable_env_values_are_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| match key {
            "ALBUMS_PORT" => Some("eighty".to_string()),
            "ALBUMS_HOST" => Some("not-an-ip".to_string()),
            _ => None,
        });

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}
