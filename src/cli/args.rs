//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, CONFIG_PATH_ENV};

/// User management API server
#[derive(Parser, Debug, Default)]
#[command(name = "apiserver")]
#[command(author, about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Config file path (YAML)
    #[arg(short, long, env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    /// Print version information as JSON and exit
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Address to bind, overrides core.address
    #[arg(short, long)]
    pub address: Option<String>,

    /// Port to listen on, overrides core.port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Command line flags win over file and environment values.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(address) = &self.address {
            config.core.address = address.clone();
        }
        if let Some(port) = self.port {
            config.core.port = port;
        }
    }
}
