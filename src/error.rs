//! Error types for dashboard fetches and configuration.
//!
//! Errors are classified by recoverability:
//! - Retryable: network issues, timeouts, 5xx responses
//! - NonRetryable: configuration errors, malformed responses
//! - RequiresUserAction: missing or expired access token

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured failure body returned by the backend (`{message, resolution}`),
/// and the object every REST wrapper fails with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            resolution: None,
        }
    }
}

/// Error types for dashboard operations
#[derive(Debug, Error)]
pub enum DashboardError {
    // Retryable errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("{error}")]
    Service { status: u16, error: ServiceError },

    // Non-retryable errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),

    // Requires user action
    #[error("Session expired or not authorized")]
    Unauthorized,
}

impl DashboardError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            DashboardError::Network(_) | DashboardError::Timeout(_) => true,
            DashboardError::Service { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this error requires user action to resolve
    pub fn requires_user_action(&self) -> bool {
        matches!(self, DashboardError::Unauthorized)
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> String {
        match self {
            DashboardError::Network(_) => "Check your connection to the dashboard server and try again.".to_string(),
            DashboardError::Timeout(_) => "The server took too long to respond. Try again.".to_string(),
            DashboardError::Service { error, .. } => error
                .resolution
                .clone()
                .unwrap_or_else(|| "Try again later or contact support.".to_string()),
            DashboardError::Configuration(_) | DashboardError::InvalidUrl(_) => {
                "Check your configuration in ~/.cgdash/config.json".to_string()
            }
            DashboardError::Parse(_) => "The server returned an unexpected response.".to_string(),
            DashboardError::Io(_) => "Check file permissions and disk space.".to_string(),
            DashboardError::Unauthorized => "Sign in again to refresh your access token.".to_string(),
        }
    }

    /// The `{message, resolution}` object handed to the view layer.
    pub fn to_service_error(&self) -> ServiceError {
        match self {
            DashboardError::Service { error, .. } => error.clone(),
            other => ServiceError {
                message: other.to_string(),
                resolution: Some(other.recovery_suggestion()),
            },
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Io(err.to_string())
    }
}

impl From<crate::config::ConfigError> for DashboardError {
    fn from(err: crate::config::ConfigError) -> Self {
        DashboardError::Configuration(err.to_string())
    }
}

impl From<url::ParseError> for DashboardError {
    fn from(err: url::ParseError) -> Self {
        DashboardError::InvalidUrl(err.to_string())
    }
}

/// Serializable error representation for the view layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
    pub error_type: ErrorType,
    pub can_retry: bool,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Retryable,
    NonRetryable,
    RequiresUserAction,
}

impl From<&DashboardError> for ErrorPayload {
    fn from(err: &DashboardError) -> Self {
        let error_type = if err.requires_user_action() {
            ErrorType::RequiresUserAction
        } else if err.is_retryable() {
            ErrorType::Retryable
        } else {
            ErrorType::NonRetryable
        };

        ErrorPayload {
            message: err.to_string(),
            error_type,
            can_retry: err.is_retryable(),
            recovery_suggestion: err.recovery_suggestion(),
        }
    }
}
