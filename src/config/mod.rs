//! Application configuration module
//!
//! Layered settings (defaults, YAML file, environment), a best-effort file
//! watcher, and application-wide constants.

mod constants;
mod settings;
mod watcher;

pub use constants::*;
pub use settings::{
    env_key, AutoTlsConfig, Config, ConfigError, CoreConfig, DbConfig, LogConfig, TlsConfig,
};
pub use watcher::ConfigWatcher;
