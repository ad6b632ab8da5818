//! Application settings: built-in defaults, overlaid by a YAML file, overlaid by
//! `APISERVER_*` environment variables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ::config::{Config as Layers, File, FileFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::constants::{
    DEFAULT_BIND_HOST, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_DB_ADDR, DEFAULT_DB_DRIVER,
    DEFAULT_DB_NAME, DEFAULT_DB_PASSWORD, DEFAULT_DB_USERNAME, DEFAULT_IDLE_TIMEOUT_SECS,
    DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL, DEFAULT_LOG_WRITERS, DEFAULT_MAX_IDLE_CONNS,
    DEFAULT_MAX_OPEN_CONNS, DEFAULT_MAX_PING_COUNT, DEFAULT_MODE, DEFAULT_ROLLING_POLICY,
    DEFAULT_SERVER_PORT, DEFAULT_SERVICE_NAME, DEFAULT_TLS_PORT, ENV_PREFIX, MODE_DEBUG,
    SQLITE_MEMORY,
};

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file {} does not exist", .0.display())]
    Missing(PathBuf),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] ::config::ConfigError),

    #[error("failed to serialize default configuration: {0}")]
    Defaults(#[from] serde_json::Error),

    #[error("failed to watch config file: {0}")]
    Watch(#[from] notify::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error("unsupported setting: {0}")]
    Unsupported(String),
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub core: CoreConfig,
    pub log: LogConfig,
    pub db: DbConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub enabled: bool,
    pub mode: String,
    pub name: String,
    pub address: String,
    pub port: u16,
    pub max_ping_count: u32,
    pub tls: TlsConfig,
    pub auto_tls: AutoTlsConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: DEFAULT_MODE.to_string(),
            name: DEFAULT_SERVICE_NAME.to_string(),
            address: String::new(),
            port: DEFAULT_SERVER_PORT,
            max_ping_count: DEFAULT_MAX_PING_COUNT,
            tls: TlsConfig::default(),
            auto_tls: AutoTlsConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Socket address to bind; an empty `address` means all interfaces.
    pub fn bind_addr(&self) -> String {
        let host = if self.address.is_empty() {
            DEFAULT_BIND_HOST
        } else {
            self.address.as_str()
        };
        format!("{}:{}", host, self.port)
    }

    /// Whether development-only routes are exposed.
    pub fn is_debug(&self) -> bool {
        self.mode.eq_ignore_ascii_case(MODE_DEBUG)
    }
}

/// Static certificate settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub port: u16,
    pub cert_path: String,
    pub key_path: String,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_TLS_PORT,
            cert_path: String::new(),
            key_path: String::new(),
        }
    }
}

impl TlsConfig {
    /// Either certificate path is set
    pub fn is_configured(&self) -> bool {
        !self.cert_path.is_empty() || !self.key_path.is_empty()
    }
}

/// Let's Encrypt settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoTlsConfig {
    pub enabled: bool,
    pub folder: String,
    pub host: String,
}

impl Default for AutoTlsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            folder: ".cache".to_string(),
            host: String::new(),
        }
    }
}

/// Log sink settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Comma separated sinks: `file`, `stdout`
    pub writers: String,
    pub logger_level: String,
    pub logger_file: String,
    /// Plain text lines instead of JSON
    pub log_format_text: bool,
    pub rolling_policy: String,
    pub log_rotate_date: u32,
    pub log_rotate_size: u32,
    pub log_backup_count: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            writers: DEFAULT_LOG_WRITERS.to_string(),
            logger_level: DEFAULT_LOG_LEVEL.to_string(),
            logger_file: DEFAULT_LOG_FILE.to_string(),
            log_format_text: false,
            rolling_policy: DEFAULT_ROLLING_POLICY.to_string(),
            log_rotate_date: 1,
            log_rotate_size: 1,
            log_backup_count: 7,
        }
    }
}

impl LogConfig {
    /// Iterate configured sink names, trimmed and lower-cased.
    pub fn writer_names(&self) -> impl Iterator<Item = String> + '_ {
        self.writers
            .split(',')
            .map(|w| w.trim().to_ascii_lowercase())
            .filter(|w| !w.is_empty())
    }
}

/// Database settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub driver: String,
    pub name: String,
    pub addr: String,
    pub username: String,
    pub password: String,
    pub max_open_conns: u32,
    pub max_idle_conns: u32,
    pub idle_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("driver", &self.driver)
            .field("name", &self.name)
            .field("addr", &self.addr)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("max_open_conns", &self.max_open_conns)
            .field("max_idle_conns", &self.max_idle_conns)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            driver: DEFAULT_DB_DRIVER.to_string(),
            name: DEFAULT_DB_NAME.to_string(),
            addr: DEFAULT_DB_ADDR.to_string(),
            username: DEFAULT_DB_USERNAME.to_string(),
            password: DEFAULT_DB_PASSWORD.to_string(),
            max_open_conns: DEFAULT_MAX_OPEN_CONNS,
            max_idle_conns: DEFAULT_MAX_IDLE_CONNS,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl DbConfig {
    /// In-memory SQLite settings with a single pinned connection.
    pub fn sqlite_memory() -> Self {
        Self {
            driver: "sqlite".to_string(),
            name: SQLITE_MEMORY.to_string(),
            max_open_conns: 1,
            max_idle_conns: 1,
            ..Self::default()
        }
    }

    /// Whether this selects an in-memory SQLite database.
    pub fn is_memory(&self) -> bool {
        self.driver == "sqlite" && self.name == SQLITE_MEMORY
    }

    /// Data source name for the configured driver.
    pub fn dsn(&self) -> String {
        match self.driver.as_str() {
            _ if self.is_memory() => "sqlite::memory:".to_string(),
            "sqlite" => format!("sqlite://{}?mode=rwc", self.name),
            driver => format!(
                "{}://{}:{}@{}/{}",
                driver, self.username, self.password, self.addr, self.name
            ),
        }
    }
}

impl Config {
    /// Load configuration using the process environment for overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(path, std::env::vars())
    }

    /// Load configuration with an explicit set of environment variables.
    ///
    /// Precedence, lowest first: built-in defaults, the YAML file at `path`,
    /// then `APISERVER_<SECTION>_<KEY>` variables. Only keys that exist in the
    /// schema are looked up, so `core.max_ping_count` reads
    /// `APISERVER_CORE_MAX_PING_COUNT`.
    pub fn load_from<I>(path: Option<&Path>, env: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let defaults = Self::default();
        let mut builder = Layers::builder().add_source(Layers::try_from(&defaults)?);

        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::Missing(path.to_path_buf()));
            }
            builder = builder.add_source(
                File::new(&path.to_string_lossy(), FileFormat::Yaml).required(true),
            );
        }

        let prefix = format!("{}_", ENV_PREFIX);
        let env: HashMap<String, String> = env
            .into_iter()
            .filter(|(k, _)| k.starts_with(&prefix))
            .collect();

        if !env.is_empty() {
            let mut keys = Vec::new();
            collect_keys(&serde_json::to_value(&defaults)?, "", &mut keys);
            for key in keys {
                if let Some(value) = env.get(&env_key(&key)) {
                    tracing::debug!(key = %key, "Configuration overridden from environment");
                    builder = builder.set_override(key, value.clone())?;
                }
            }
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}

/// Environment variable name for a dotted key.
pub fn env_key(key: &str) -> String {
    format!("{}_{}", ENV_PREFIX, key.replace('.', "_").to_ascii_uppercase())
}

/// Collect dotted paths of every leaf in a serialized config tree.
fn collect_keys(value: &Value, prefix: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let path = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{}.{}", prefix, k)
                };
                collect_keys(v, &path, out);
            }
        }
        _ => out.push(prefix.to_string()),
    }
}
