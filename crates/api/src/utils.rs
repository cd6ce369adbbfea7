use tracing_subscriber::EnvFilter;

/// `RUST_LOG` when set, `info` otherwise.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("[setup_tracing] A global subscriber is already installed");
    }
}
