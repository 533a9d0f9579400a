use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber, logging to stderr so stdout stays clean
/// for JSON output. `RUST_LOG` takes precedence over `level`.
///
/// Calling this twice returns an error instead of panicking.
pub fn init_logging(level: &str) -> Result<(), String> {
    let default_filter = format!("wealthpath={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| format!("failed to initialize logging: {e}"))
}
