//! Structured logging initialization via `tracing`.

use crate::CertificationConfig;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with sensible defaults.
///
/// Respects the `RUST_LOG` environment variable for filtering.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

/// Initialize the tracing subscriber from deployment configuration.
///
/// `RUST_LOG` still wins over the configured level when set, so a
/// deployment can be debugged without editing its config file. The
/// `json` format is for log shippers; anything else renders for humans.
pub fn init_tracing_with(config: &CertificationConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
