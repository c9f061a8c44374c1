use std::env;

/// Application-level constants
pub const APP_NAME: &str = "Remedi";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL used when REMEDI_API_URL is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Request timeout for the recognition and reminder services.
/// Recognition runs a vision model server-side and can take a while.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Get the base URL of the prescription API gateway
/// (one host serves both the upload and the reminder routes)
pub fn api_base_url() -> String {
    env::var("REMEDI_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
}

/// Get the default tracing filter when RUST_LOG is not set
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}
