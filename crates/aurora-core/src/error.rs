//! Centralized error types for Aurora Watch.
//!
//! Crate-level errors (`aurora-api`, `aurora-ui`) map into this hierarchy at
//! the application edge so logs and the binary see one vocabulary.

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a short, display-safe message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Aurora feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Render error: {0}")]
    Render(#[from] RenderFailure),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Feed(e) => e.user_message(),
            AppError::Render(_) => "Could not draw this screen.",
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }

    /// Whether the refresh loop can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Network(_) | AppError::Feed(_) | AppError::Render(_)
        )
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Client setup failed: {0}")]
    ClientSetup(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your phone's connection."
            }
            NetworkError::Timeout => "The request timed out. Will retry shortly.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The aurora service is having issues. Will retry shortly."
            }
            NetworkError::ServerError { .. } => "The request failed. Will retry shortly.",
            NetworkError::InvalidResponse(_) => "Received an unexpected response.",
            NetworkError::ClientSetup(_) => "Could not set up the network client.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
        }
    }
}

/// Aurora feed errors: location lookup and data fetch.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Unexpected payload: {0}")]
    BadPayload(String),
}

impl FeedError {
    pub fn user_message(&self) -> &'static str {
        match self {
            FeedError::LocationUnavailable(_) => "Location unavailable. Using the default location.",
            FeedError::FetchFailed(_) => "Could not fetch aurora data. Showing last values.",
            FeedError::BadPayload(_) => "Aurora data looked wrong. Showing last values.",
        }
    }
}

/// Rendering failures surfaced from the UI crate.
#[derive(Debug, Error)]
#[error("{view}: {message}")]
pub struct RenderFailure {
    pub view: String,
    pub message: String,
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_builder() {
            NetworkError::ClientSetup(self.to_string())
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
