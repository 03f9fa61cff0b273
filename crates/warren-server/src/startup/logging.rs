//! Logging initialization
//!
//! Console output is human-readable by default and switches to Bunyan JSON
//! when `log_json` is set. With `log_to_file`, events are also written to a
//! rolling `warren.log` (or `warren-fork.log` for forked processes) under
//! the log directory.
//!
//! `RUST_LOG` takes precedence over the configured `log` level.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};
use warren_runtime::Runtime;

const APP_NAME: &str = "warren";

/// Log rotation policy
#[derive(Debug, Clone, Copy)]
pub enum LogRotation {
    /// Rotate daily (default)
    Daily,
    /// Rotate hourly
    Hourly,
    /// Never rotate (single file)
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Base log directory (default: `~/warren/logs`)
    pub log_dir: PathBuf,
    /// File name inside `log_dir`
    pub file_name: String,
    pub level: Level,
    /// Bunyan JSON instead of the plain text format
    pub json: bool,
    pub file_logging: bool,
    pub rotation: LogRotation,
}

fn default_log_dir() -> PathBuf {
    std::env::var("WARREN_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(format!("{}/warren/logs", home))
        })
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            file_name: format!("{}.log", APP_NAME),
            level: Level::INFO,
            json: false,
            file_logging: false,
            rotation: LogRotation::Daily,
        }
    }
}

impl LoggingConfig {
    /// Create from the runtime `log`, `log_json` and `log_to_file` keys.
    pub fn from_runtime(runtime: &Runtime) -> Self {
        let file_name = if runtime.is_fork() {
            format!("{}-fork.log", APP_NAME)
        } else {
            format!("{}.log", APP_NAME)
        };

        Self {
            log_dir: default_log_dir(),
            file_name,
            level: runtime.log_level().parse().unwrap_or(Level::INFO),
            json: runtime.log_json(),
            file_logging: runtime.log_to_file(),
            rotation: LogRotation::Daily,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.to_string()))
    }
}

/// Keeps the non-blocking file writers alive; buffered output is flushed on drop.
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

/// Initialize the global tracing subscriber.
///
/// The returned guard must be kept alive for the duration of the application.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let mut guards: Vec<WorkerGuard> = Vec::new();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if config.json {
        layers.push(Box::new(JsonStorageLayer));
        layers.push(Box::new(
            BunyanFormattingLayer::new(APP_NAME.into(), std::io::stdout)
                .with_filter(config.env_filter()),
        ));
    } else {
        layers.push(Box::new(
            fmt::layer()
                .with_target(true)
                .with_thread_names(true)
                .with_filter(config.env_filter()),
        ));
    }

    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)?;
        let appender =
            RollingFileAppender::new(config.rotation.into(), &config.log_dir, &config.file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);

        if config.json {
            layers.push(Box::new(
                BunyanFormattingLayer::new(APP_NAME.into(), writer)
                    .with_filter(config.env_filter()),
            ));
        } else {
            layers.push(Box::new(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_thread_names(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .with_filter(config.env_filter()),
            ));
        }
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if config.file_logging {
        tracing::info!(
            log_dir = %config.log_dir.display(),
            file = %config.file_name,
            "File logging initialized"
        );
    }

    Ok(LoggingGuard {
        _file_guards: guards,
    })
}
