//! Tracing subscriber setup

use std::path::PathBuf;

use compact_str::{CompactString, ToCompactString};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

use crate::result::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive such as `info` or `recent_langs=debug`
    pub filter: CompactString,
    pub format: LogFormat,
    /// Also write plain-text logs here when set
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            format: LogFormat::Text,
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG` and `LOG_FORMAT`
    pub fn from_env() -> Self {
        let filter = std::env::var("RUST_LOG")
            .ok()
            .filter(|f| !f.trim().is_empty())
            .map(CompactString::from)
            .unwrap_or_else(|| "info".into());
        let format = match std::env::var("LOG_FORMAT") {
            Ok(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self { filter, format, log_dir: None }
    }

    pub fn with_log_dir(mut self, log_dir: Option<PathBuf>) -> Self {
        self.log_dir = log_dir;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.filter.as_str()).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global subscriber; keep the returned guard alive until exit
pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);
    match config.format {
        LogFormat::Json => layers.push(stderr.json().with_filter(config.env_filter()).boxed()),
        LogFormat::Text => layers.push(stderr.with_filter(config.env_filter()).boxed()),
    }

    let mut guard = None;
    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir).map_err(|e| AppError::io_error(log_dir, e))?;
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix("recent-langs")
            .filename_suffix("log")
            .build(log_dir)
            .map_err(|e| AppError::LoggingError(e.to_compact_string()))?;
        let (writer, worker_guard) = tracing_appender::non_blocking(appender);
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(config.env_filter())
                .boxed(),
        );
        guard = Some(worker_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| AppError::LoggingError(e.to_compact_string()))?;

    Ok(guard)
}
