use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "LLMGATEWAY_LOG";

/// Installs the global subscriber. Logs go to stderr so that stdout only
/// carries command output.
pub fn init_tracing(verbose: bool) -> anyhow::Result<Guard> {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let level = if verbose { "llmgateway=debug" } else { "llmgateway=info" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level)))
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_target(false)
        .with_writer(writer)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    debug!(verbose, "Logging initialized");
    Ok(Guard(guard))
}

pub struct Guard(#[allow(dead_code)] WorkerGuard);
