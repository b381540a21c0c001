use std::fmt;
use std::net::Ipv6Addr;

use serde::{Deserialize, Serialize};

/// Externally reachable address of the alert receiver. Only known once the
/// receiver service has a node port and a node address has been picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEndpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl WebhookEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            path: String::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// `host:port`, used when probing the receiver directly. IPv6 hosts
    /// are bracketed.
    pub fn authority(&self) -> String {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn url(&self) -> String {
        format!(
            "http://{}/{}",
            self.authority(),
            self.path.trim_start_matches('/')
        )
    }
}

impl fmt::Display for WebhookEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}
