use std::fs;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logger system
///
/// Console output is always on. When `log_dir` is given, a daily rolling
/// file is written there as well. `RUST_LOG` overrides `level`.
pub fn init_logger(level: &str, log_dir: Option<&Path>) -> Result<(), String> {
    // Capture log macro logs
    let _ = tracing_log::LogTracer::init();

    let console_layer = fmt::Layer::new()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    let file_layer = match log_dir {
        Some(dir) => {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .map_err(|e| format!("Failed to create log directory: {}", e))?;
            }

            let file_appender = tracing_appender::rolling::daily(dir, "llsed.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // The writer must outlive every log call; the process never re-initializes.
            std::mem::forget(guard);

            Some(
                fmt::Layer::new()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true),
            )
        }
        None => None,
    };

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init: tests and embedders may have installed a subscriber already
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    match log_dir {
        Some(dir) => info!("Logger initialized (console + {})", dir.display()),
        None => info!("Logger initialized (console)"),
    }
    Ok(())
}
