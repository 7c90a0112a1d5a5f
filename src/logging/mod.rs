use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::config::GeneralConfig;

const LOG_FILE_PREFIX: &str = "sink-rotator";
const KEPT_LOG_FILES: usize = 7;

/// Logging configuration
pub struct LoggingConfig {
    pub level: Level,
    pub file_output: bool,
    pub log_dir: Option<PathBuf>,
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            file_output: false,
            log_dir: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Build from the `[general]` section; `verbose` forces debug output
    pub fn from_general(general: &GeneralConfig, verbose: bool) -> Result<Self> {
        let level = if verbose {
            Level::DEBUG
        } else {
            general.level()?
        };

        Ok(Self {
            level,
            file_output: general.log_to_file,
            log_dir: None,
            json_format: general.json_logs,
        })
    }
}

/// Initialize logging: stderr always, plus a daily-rotated file when enabled
///
/// Stdout is left alone. The returned guard must be held until exit so the
/// file writer gets flushed.
pub fn initialize_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>> {
    let mut layers = Vec::new();
    let mut guard = None;

    let env_filter = EnvFilter::new(format!(
        "sink_rotator={}",
        config.level.as_str().to_lowercase()
    ));

    let console_layer = if config.json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .boxed()
    };
    layers.push(console_layer);

    if config.file_output {
        let dir = match config.log_dir.clone() {
            Some(dir) => dir,
            None => get_default_log_dir()?,
        };
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix("log")
            .max_log_files(KEPT_LOG_FILES)
            .build(&dir)
            .context("Failed to create log file appender")?;
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(non_blocking)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed()
        };
        layers.push(file_layer);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// Get the default log directory path
pub fn get_default_log_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir().context("Failed to get local data directory")?;
    Ok(data_dir.join("sink-rotator/logs"))
}
