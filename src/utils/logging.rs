// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up the logging framework using tracing_subscriber.
///
/// Log level filters come from the `RUST_LOG` environment variable; the
/// default keeps the per-document progress lines visible.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ncrb_extractor=info"));

    fmt().with_env_filter(filter).init();

    tracing::debug!("Logging setup complete.");
}
