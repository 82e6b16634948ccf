//! Logging initialization using the `tracing` ecosystem.
//!
//! The library crates only emit `tracing` events; binaries call
//! [`init_logging`] once to decide where they go. Console output is
//! human-readable; the optional daily-rotated file gets one JSON object per
//! event. `RUST_LOG` overrides the level passed in.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// Returns the file writer's guard when `log_dir` is set; keep it alive for
/// the life of the program or buffered lines are lost on exit. A second call
/// is a no-op.
///
/// # Parameters
///
/// - `log_level`: default filter if `RUST_LOG` is not set (e.g. `"info"`,
///   `"bx_rest=debug,info"`)
/// - `log_dir`: optional directory for daily-rotating log files
/// - `module_name`: log file prefix (e.g. `"bx-runner"`)
pub fn init_logging(log_level: &str, log_dir: Option<&str>, module_name: &str) -> Option<WorkerGuard> {
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, module_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer).with_ansi(false).with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(file_layer)
        .try_init();

    guard
}

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
