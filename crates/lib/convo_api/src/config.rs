//! Webhook server configuration.

/// Configuration for the webhook server.
///
/// Built by the server binary from its arguments and passed into
/// [`crate::AppState`]; nothing reads the environment at request time.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8080").
    pub bind_addr: String,
    /// Log raw request headers and bodies at debug level.
    pub log_requests: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            log_requests: false,
        }
    }
}
