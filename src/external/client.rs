use std::time::Duration;

/// User-Agent sent to push providers
pub fn user_agent() -> String {
    format!("notify-relay/{}", crate::pkg_version())
}

/// Build the HTTP client used for outbound provider calls
///
/// One client is built at startup and shared by every request so TCP and
/// TLS connections are pooled across deliveries.
///
/// No overall request timeout is set: a delivery waits as long as the
/// transport allows unless the provider configures its own per-request
/// timeout.
///
/// # Features
/// - **Connection pooling**: idle connections kept for 90s
/// - **HTTP/2**: negotiated via ALPN when the provider supports it
/// - **Security**: Rustls for TLS (no OpenSSL dependency)
pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(user_agent())
        .build()
}
