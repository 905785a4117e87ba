//! Logging infrastructure for QuickCred
//!
//! Structured logging through `tracing`. Events go to stderr and to a
//! daily-rolling file in `%APPDATA%\QuickCred\logs`. Every event carries a
//! `category` field (`CREDENTIALS`, `EDITOR`, `WINDOW`, `SYSTEM`).
//!
//! SECURITY: passwords are never logged, only their lengths.

use once_cell::sync::OnceCell;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "quickcred_lib=info";
const LOG_FILE_PREFIX: &str = "quickcred.log";

/// Keeps the file writer flushing until process exit
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Builds the level filter from `RUST_LOG`, falling back to info for this crate
pub fn build_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initializes the global tracing subscriber.
///
/// Falls back to stderr-only logging when the log directory cannot be
/// created. Calling this twice returns an error from the second call.
pub fn init_tracing() -> Result<(), String> {
    let file_layer = match crate::infra::paths::get_logs_dir() {
        Ok(dir) => Some(file_layer(&dir)),
        Err(e) => {
            eprintln!("[QuickCred] File logging disabled: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(build_filter())
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| format!("Failed to initialize tracing: {}", e))?;

    tracing::info!(
        category = "SYSTEM",
        version = env!("CARGO_PKG_VERSION"),
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        "Logging initialized"
    );
    Ok(())
}

fn file_layer<S>(dir: &Path) -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);

    fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(writer)
}
