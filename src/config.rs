//! Configuration options for the registry client

use std::time::Duration;

/// Configuration options for the registry client
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Per-request timeout applied to every call against the remote service
    pub request_timeout: Option<Duration>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl RegistryOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }
}
