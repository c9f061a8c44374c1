pub mod config;
pub mod models;
pub mod schedule;
pub mod session;
pub mod validation;
pub mod submission;
pub mod recognition; // prescription image -> structured medications
pub mod reminder; // SMS reminder service
pub mod orchestrator;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries and integration harnesses.
/// RUST_LOG takes precedence over the built-in filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
