// crates/gemchat-server/src/http.rs
// Shared HTTP client for upstream calls

use std::time::Duration;

/// Default request timeout (5 minutes for generation calls)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Default connect timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the shared HTTP client with the given request timeout.
///
/// Created once at startup and handed to the Gemini client. Uses connection
/// pooling internally.
pub fn create_shared_client(request_timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(request_timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(request_timeout))
        .pool_max_idle_per_host(10)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
