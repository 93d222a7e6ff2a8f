use std::{path::Path, sync::Mutex};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";
const LOG_FILE_PREFIX: &str = "sysmute.log";

static TRACING_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Installs the global subscriber.
///
/// Without `log_dir` events go to stderr with colours. With it, they go to a
/// daily rolling file through a non-blocking writer whose guard lives until
/// the process exits. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(log_dir: Option<&Path>) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let initialized = match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            store_tracing_guard(guard);

            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_level(true)
                .with_target(true)
                .try_init()
                .is_ok()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_level(true)
            .with_target(false)
            .try_init()
            .is_ok(),
    };

    if initialized {
        tracing::debug!(msg = "tracing_initialized", log_dir = ?log_dir);
    }
}

/// Drops the file writer guard so buffered lines reach disk.
///
/// Call before `std::process::exit`, which skips destructors. Events logged
/// afterwards are lost.
pub fn flush() {
    let guard = TRACING_GUARD.lock().ok().and_then(|mut slot| slot.take());
    drop(guard);
}

fn store_tracing_guard(guard: WorkerGuard) {
    if let Ok(mut slot) = TRACING_GUARD.lock() {
        *slot = Some(guard);
    }
}
