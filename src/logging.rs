use tracing_subscriber::{fmt, EnvFilter};

/// Install a compact stderr `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Calling this again after a global
/// subscriber is set does nothing, so tests and embedders can call it freely.
pub fn init_logging(default_filter: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        tracing::debug!("tracing initialized");
    }
}
