//! Error types for taskdeck-core

use thiserror::Error;

/// Result type alias using taskdeck-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Backend message returned when a bearer token is rejected.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Could not validate credentials";

/// Errors that can occur in taskdeck-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// No token is stored for a request that requires one
    #[error("No authentication token found.")]
    AuthMissing,

    /// The request could not be completed
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success response from the backend
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A response body was required but the backend sent none
    #[error("Backend returned an empty response for {0}")]
    EmptyResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Token storage error
    #[error("Token storage error: {0}")]
    Storage(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid input rejected before any request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the failure means the session is missing or no longer valid.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::AuthMissing => true,
            Self::Api { status, message } => {
                matches!(status, 401 | 403) || message == INVALID_CREDENTIALS_MESSAGE
            }
            _ => false,
        }
    }

    /// HTTP status carried by an API error, if any.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_missing_message_matches_backend_wording() {
        assert_eq!(
            Error::AuthMissing.to_string(),
            "No authentication token found."
        );
    }

    #[test]
    fn unauthorized_statuses_are_auth_failures() {
        let unauthorized = Error::Api {
            status: 401,
            message: "nope".to_string(),
        };
        let forbidden = Error::Api {
            status: 403,
            message: "nope".to_string(),
        };
        assert!(unauthorized.is_auth_failure());
        assert!(forbidden.is_auth_failure());
    }

    #[test]
    fn credential_message_is_auth_failure_regardless_of_status() {
        let error = Error::Api {
            status: 400,
            message: INVALID_CREDENTIALS_MESSAGE.to_string(),
        };
        assert!(error.is_auth_failure());
    }

    #[test]
    fn not_found_is_not_auth_failure() {
        let error = Error::Api {
            status: 404,
            message: "Task not found".to_string(),
        };
        assert!(!error.is_auth_failure());
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.to_string(), "Task not found");
    }
}
