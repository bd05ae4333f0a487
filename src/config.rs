//! Runtime configuration for the scan service.
//!
//! The audit-service location and timeouts are injected here instead of being
//! read from ambient globals inside the service layer.

use std::env;
use std::time::Duration;

use crate::error::{AppError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote audit service, without a trailing slash.
    pub audit_base_url: String,
    /// Per-request timeout applied to the HTTP client.
    pub request_timeout: Duration,
    /// Retry a scan request once when the transport itself fails.
    pub retry_on_network_error: bool,
}

impl Config {
    pub fn new(audit_base_url: impl Into<String>) -> Self {
        Self {
            audit_base_url: audit_base_url.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry_on_network_error: true,
        }
    }

    /// Read configuration from the environment.
    ///
    /// `AUDIT_SERVICE_URL` is required; `AUDIT_TIMEOUT_SECS` is optional and
    /// defaults to 30 seconds.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("AUDIT_SERVICE_URL")
            .map_err(|_| AppError::Config("AUDIT_SERVICE_URL is not set".into()))?;

        let timeout_secs = match env::var("AUDIT_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| AppError::Config(format!("invalid AUDIT_TIMEOUT_SECS: {raw}")))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            request_timeout: Duration::from_secs(timeout_secs),
            ..Self::new(base_url)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let config = Config::new("http://localhost:8000");
        assert_eq!(config.audit_base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.retry_on_network_error);
    }
}
