use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "cmdsearch";
const MAX_LOG_FILES: usize = 5;
pub const LOG_ENV_VAR: &str = "CMDSEARCH_LOG";

static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to create log directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open log file: {0}")]
    Appender(#[from] InitError),
    #[error("failed to install log subscriber: {0}")]
    Subscriber(String),
}

pub fn logs_dir() -> PathBuf {
    crate::config::stable_app_data_dir()
        .unwrap_or_else(|| std::env::temp_dir().join(crate::config::APP_DIR_NAME))
        .join("logs")
}

/// Routes `tracing` output to a daily rotated file under [`logs_dir`].
/// `CMDSEARCH_LOG` overrides `level` with a full filter directive.
pub fn init(level: &str) -> Result<(), LoggingError> {
    let dir = logs_dir();
    std::fs::create_dir_all(&dir).map_err(|source| LoggingError::Io {
        path: dir.clone(),
        source,
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(&dir)?;

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(appender)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| LoggingError::Subscriber(e.to_string()))?;

    install_panic_hook();
    tracing::info!(dir = %dir.display(), "logging initialized");
    Ok(())
}

fn install_panic_hook() {
    let _ = PANIC_HOOK_INSTALLED.get_or_init(|| {
        let prior = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let location = panic_info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "unknown".to_string());
            let payload = panic_info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload unavailable".to_string());
            tracing::error!(%location, %payload, "panic");
            prior(panic_info);
        }));
    });
}
