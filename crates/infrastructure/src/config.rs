//! Service configuration.

use std::time::Duration;

use url::Url;

/// Connection settings for the remote time service.
///
/// The base URL is always injected explicitly; nothing is read from
/// ambient or global scope. No request timeout is applied unless one is
/// opted into, so an unresponsive service leaves a request in flight
/// indefinitely.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Host/port of the time service, e.g. `http://127.0.0.1:8080`.
    pub base_url: Url,
    /// Optional per-request timeout. `None` means wait forever.
    pub timeout: Option<Duration>,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl ServiceConfig {
    /// Creates a configuration for the given base URL with no timeout.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
            user_agent: concat!("timeview/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Opts into a per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
