//! Client configuration
//!
//! A [`Config`] is built once per client and never mutated afterwards;
//! concurrent calls share it by reference.

/// Default daemon address
pub const DEFAULT_HOST: &str = "http://127.0.0.1:11434";

/// Immutable client configuration
#[derive(Debug, Clone)]
pub struct Config {
    host: String,
}

impl Config {
    /// Create a configuration pointing at the default local daemon
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
        }
    }

    /// Override the daemon base URL
    ///
    /// Trailing slashes are stripped so endpoint paths join cleanly.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        let host = host.into();
        self.host = host.trim_end_matches('/').to_string();
        self
    }

    /// The normalized daemon base URL
    pub fn host_url(&self) -> &str {
        &self.host
    }

    /// Build the URL for a daemon API endpoint
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.host, endpoint)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
