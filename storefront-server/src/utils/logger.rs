//! Logging Infrastructure
//!
//! `tracing-subscriber` with an `EnvFilter`; `RUST_LOG` wins over the
//! configured level. With a log directory, output goes to a daily rolling file.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "storefront_server=info,tower_http=info,http_access=info";

/// Initialize the logger (stdout, default directives)
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional level and file output
///
/// Returns the appender guard when logging to a file; keep it alive for the
/// lifetime of the process or buffered lines are lost.
pub fn init_logger_with_file(
    log_level: Option<&str>,
    log_dir: Option<&str>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match log_level {
        Some(level) => EnvFilter::new(format!(
            "storefront_server={level},tower_http={level},http_access={level},security={level}"
        )),
        None => EnvFilter::new(DEFAULT_DIRECTIVES),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok() {
            let file_appender = tracing_appender::rolling::daily(log_path, "storefront-server");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            // try_init: tests and the CLI may have installed a subscriber already
            let _ = builder.with_ansi(false).with_writer(writer).try_init();
            return Some(guard);
        }
        eprintln!("Log directory {dir} is not writable, logging to stdout");
    }

    let _ = builder.try_init();
    None
}
