use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use super::config::Config;

/// Initialize logging.
///
/// Stderr gets `warn` and above unless `verbose` is set (then
/// `bucketsweep=debug`); `RUST_LOG` overrides both. With `to_file`, a
/// daily-rolling log is also written to `~/.bucketsweep/logs/`.
///
/// The returned guard must stay alive for the file writer to flush.
pub fn init(verbose: bool, to_file: bool) -> Result<Option<WorkerGuard>> {
    let default_directive = if verbose { "bucketsweep=debug" } else { "warn" };
    let stderr_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    if !to_file {
        tracing_subscriber::registry()
            .with(stderr_layer)
            .try_init()
            .context("Failed to install log subscriber")?;
        return Ok(None);
    }

    let logs_dir = Config::logs_dir();
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create log dir: {}", logs_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&logs_dir, "bucketsweep.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(EnvFilter::new("info,bucketsweep=debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    tracing::info!("bucketsweep logging initialized at {}", logs_dir.display());

    Ok(Some(guard))
}
