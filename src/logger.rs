//! Tracing subscriber setup from the `log` config section.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::{ConfigError, LogConfig, LOG_WRITER_FILE, LOG_WRITER_STDOUT};
use crate::errors::AppResult;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `log.logger_level`. Each entry in `log.writers` gets
/// its own formatter; the file sink appends and never rotates.
pub fn init(config: &LogConfig) -> AppResult<()> {
    let directive = level_directive(&config.logger_level)?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    for writer in config.writer_names() {
        match writer.as_str() {
            LOG_WRITER_STDOUT => {
                layers.push(sink_layer(std::io::stdout, config.log_format_text, true))
            }
            LOG_WRITER_FILE => {
                let file = open_log_file(Path::new(&config.logger_file))?;
                layers.push(sink_layer(file, config.log_format_text, false));
            }
            _ => {}
        }
    }
    if layers.is_empty() {
        layers.push(sink_layer(std::io::stdout, config.log_format_text, true));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    Ok(())
}

/// Map a configured level name to an `EnvFilter` directive.
///
/// Anything else would parse as a target name and silence every event.
fn level_directive(level: &str) -> Result<&'static str, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "" | "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" | "dpanic" | "panic" | "fatal" => Ok("error"),
        "off" => Ok("off"),
        other => Err(ConfigError::Logging(format!(
            "unknown log.logger_level {:?}",
            other
        ))),
    }
}

fn sink_layer<W>(writer: W, text: bool, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_target(true);
    if text {
        layer.with_ansi(ansi).boxed()
    } else {
        layer.json().boxed()
    }
}

fn open_log_file(path: &Path) -> Result<Arc<fs::File>, ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ConfigError::Logging(format!("cannot create {}: {}", parent.display(), e))
        })?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ConfigError::Logging(format!("cannot open {}: {}", path.display(), e)))?;

    Ok(Arc::new(file))
}
