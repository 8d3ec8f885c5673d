use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "GPUPROF_LOG";

/// Initialize structured logging with environment filter.
/// Set GPUPROF_LOG=debug (or trace, info, warn, error) for verbosity control.
/// Logs go to stderr so stdout stays machine-readable.
pub fn init_logging() {
    let (filter, source) = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => (filter, LOG_ENV),
        Err(_) => (EnvFilter::new("info"), "default"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("logging initialised (filter from {})", source);
}
