//! HTTP server configuration object.

use std::time::Duration;

use user_service::inbound::http::error::ErrorBodyPolicy;
use user_service::settings::Listener;

/// Read and write deadline applied to client connections.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(15);

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) listener: Listener,
    pub(crate) error_body_policy: ErrorBodyPolicy,
    pub(crate) client_timeout: Duration,
}

impl ServerConfig {
    /// Serve on `listener` with the default error body policy.
    #[must_use]
    pub fn new(listener: Listener) -> Self {
        Self {
            listener,
            error_body_policy: ErrorBodyPolicy::default(),
            client_timeout: CLIENT_TIMEOUT,
        }
    }

    /// Choose the body written for domain failures.
    #[must_use]
    pub fn with_error_body_policy(mut self, policy: ErrorBodyPolicy) -> Self {
        self.error_body_policy = policy;
        self
    }
}
