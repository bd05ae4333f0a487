//! Error types for the report service.
//!
//! This module provides structured error handling with:
//! - `AppError`: Domain-specific errors for application operations
//! - `Result<T>`: Type alias for Results using AppError

use thiserror::Error;

/// Domain-specific errors for application operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid or malformed URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Network request failed
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from the remote audit service
    #[error("Audit service error {status}: {detail}")]
    AuditService { status: u16, detail: String },

    /// Report store operation failed
    #[error("Report store error: {0}")]
    Store(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
