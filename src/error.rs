use std::time::Duration;
use thiserror::Error;

/// Error categorization for the gateway's handling pipeline
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (permanent failures)
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    // I/O errors (potentially transient)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors (usually permanent)
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    // Network errors (transient)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network timeout after {timeout:?}: {message}")]
    NetworkTimeout { timeout: Duration, message: String },

    // Client errors (permanent - don't retry)
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    // Parse errors
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    // Cache errors
    #[error("Cache error: {operation} failed - {reason}")]
    Cache { operation: String, reason: String },

    // General service error
    #[error("Service error: {0}")]
    Service(String),

    // Provider errors
    #[error("Provider error: {0}")]
    Provider(String),
}

/// Error categorization for callers deciding whether a failure is permanent
/// or a transient upstream hiccup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Permanent errors - should not retry
    Permanent,
    /// Transient errors - safe to retry
    Transient,
}

impl Error {
    /// Categorize error for fallback decisions
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_)
            | Self::AuthenticationFailed(_)
            | Self::InvalidInput { .. }
            | Self::Parse { .. }
            | Self::Serde(_) => ErrorCategory::Permanent,

            Self::Http(_)
            | Self::NetworkTimeout { .. }
            | Self::Io(_)
            | Self::Cache { .. }
            | Self::Service(_)
            | Self::Provider(_) => ErrorCategory::Transient,
        }
    }

    /// Check if error is retryable by an outer scheduler (the gateway itself
    /// never retries)
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// Provider error conversion
impl From<crate::client::ProviderError> for Error {
    fn from(err: crate::client::ProviderError) -> Self {
        match err {
            crate::client::ProviderError::Network(msg) => {
                Self::Provider(format!("Network error: {msg}"))
            }
            crate::client::ProviderError::Parse(msg) => Self::Parse {
                context: "provider".to_string(),
                message: msg,
            },
            crate::client::ProviderError::Auth(msg) => Self::AuthenticationFailed(msg),
            crate::client::ProviderError::InvalidQuery(msg) => Self::InvalidInput {
                field: "query".to_string(),
                reason: msg,
            },
            crate::client::ProviderError::ServiceUnavailable(msg) => {
                Self::Provider(format!("Service unavailable: {msg}"))
            }
            crate::client::ProviderError::Timeout => Self::NetworkTimeout {
                timeout: Duration::from_secs(30),
                message: "provider call timed out".to_string(),
            },
            crate::client::ProviderError::Other(msg) => Self::Provider(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_permanent() {
        let err = Error::InvalidInput {
            field: "query".to_string(),
            reason: "empty".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Permanent);
        assert!(!err.is_retryable());
    }

    #[test]
    fn provider_error_is_transient() {
        let err = Error::Provider("search backend down".to_string());
        assert_eq!(err.category(), ErrorCategory::Transient);
        assert!(err.is_retryable());
    }

    #[test]
    fn provider_error_conversion_preserves_detail() {
        let err: Error = crate::client::ProviderError::Network("refused".to_string()).into();
        assert!(format!("{err}").contains("refused"));
    }
}
