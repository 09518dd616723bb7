//! Tracing subscriber setup for binaries embedding the runtime.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::RuntimeConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs the global subscriber: stderr always, plus `werewolf.log` in
/// `config.log_dir` when one is configured.
///
/// `RUST_LOG` overrides `config.log_filter`. The returned guard flushes the
/// file writer when dropped, so the caller keeps it alive until exit.
pub fn setup_logging(config: &RuntimeConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
                path: dir.clone(),
                source,
            })?;
            let file_appender = tracing_appender::rolling::never(dir, "werewolf.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    if let Some(dir) = &config.log_dir {
        tracing::info!("Log file: {}/werewolf.log", dir.display());
    }
    Ok(guard)
}
