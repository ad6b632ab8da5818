//! apiserver - Application entry point

use clap::Parser;

use apiserver::{cli::Cli, commands, config::Config, logger};

#[tokio::main]
async fn main() {
    // .env is optional and may name the config file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    if cli.version {
        if let Err(e) = commands::version::execute() {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        return;
    }

    // Load configuration: defaults < file < environment < flags
    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = logger::init(&config.log) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
    tracing::debug!(config = ?config, "Configuration loaded");

    if let Err(e) = commands::serve::execute(config, cli.config.as_deref()).await {
        tracing::error!("Server failed: {}", e);
        std::process::exit(1);
    }
}
