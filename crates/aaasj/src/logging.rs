//! Tracing setup.
//!
//! Console output is always on. With `LOG_TO_FILE=true` the same events are
//! also written as JSON lines to daily rolling files.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives (default: `aaasj=debug,aaasj_auth=debug,tower_http=debug`)
//! - `LOG_TO_FILE`: "true" or "1" enables file logging
//! - `LOG_DIR`: log directory (default: `logs`)
//! - `LOG_MAX_FILES`: number of daily files to keep (default: 14)

use std::path::PathBuf;

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_FILTER: &str = "aaasj=debug,aaasj_auth=debug,tower_http=debug";
const LOG_FILE_PREFIX: &str = "aaasj";

#[derive(Debug, Clone)]
pub struct FileLoggingConfig {
    pub enabled: bool,
    pub log_dir: PathBuf,
    pub max_files: usize,
}

impl FileLoggingConfig {
    pub fn from_env() -> Self {
        let enabled = std::env::var("LOG_TO_FILE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let log_dir = std::env::var("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("logs"));

        let max_files = std::env::var("LOG_MAX_FILES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(14);

        Self {
            enabled,
            log_dir,
            max_files,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer when dropped, so hold it for
/// the lifetime of the process. `None` means console-only logging.
pub fn init() -> Option<WorkerGuard> {
    let config = FileLoggingConfig::from_env();
    let console_layer = tracing_subscriber::fmt::layer().with_filter(env_filter());

    if !config.enabled {
        tracing_subscriber::registry().with(console_layer).init();
        return None;
    }

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(config.max_files)
        .build(&config.log_dir);

    let appender = match appender {
        Ok(appender) => appender,
        Err(e) => {
            tracing_subscriber::registry().with(console_layer).init();
            tracing::warn!(
                error = %e,
                log_dir = %config.log_dir.display(),
                "Could not open log directory, logging to console only"
            );
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(env_filter());

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!(
        log_dir = %config.log_dir.display(),
        max_files = config.max_files,
        "File logging enabled"
    );

    Some(guard)
}
