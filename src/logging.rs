use crate::error::{Error, Result};
use std::path::Path;
use std::sync::LazyLock;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;

pub const LOG_PREFIX: &str = "typerush";

/// Route `tracing` output to a daily rolling file; the terminal belongs to the UI.
///
/// The level comes from `log_level`, then `RUST_LOG`, then defaults to `info`.
pub fn enable_logging(log_dir: &Path, log_level: Option<LevelFilter>) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(5)
        .filename_prefix(LOG_PREFIX)
        .build(log_dir)
        .map_err(|e| Error::logging(e.to_string()))?;

    let level = log_level
        .map(|v| v.to_string())
        .unwrap_or_else(|| std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()));

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(format!(
            "{}={level}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
        )))
        .with_ansi(false)
        .with_writer(appender)
        .try_init()
        .map_err(|e| Error::logging(e.to_string()))
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .try_init();
});
