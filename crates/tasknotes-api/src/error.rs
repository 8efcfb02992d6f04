//! Error types for the TaskNotes API client.

use std::fmt;

/// Errors reported by the TaskNotes server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP-level error with status code.
    Http { status: u16, message: String },
    /// Authentication failure.
    Auth { message: String },
    /// Resource not found.
    NotFound { resource: String, id: String },
    /// The server rejected the request body or parameters.
    Validation { message: String },
    /// Network/connection error.
    Network { message: String },
    /// The server does not implement the endpoint.
    Unsupported { endpoint: String, status: u16 },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { status, message } => write!(f, "HTTP error {}: {}", status, message),
            ApiError::Auth { message } => write!(f, "Auth error: {}", message),
            ApiError::NotFound { resource, id } => write!(f, "{} not found: {}", resource, id),
            ApiError::Validation { message } => write!(f, "Validation error: {}", message),
            ApiError::Network { message } => write!(f, "Network error: {}", message),
            ApiError::Unsupported { endpoint, status } => {
                write!(f, "endpoint not supported by server ({}): {}", status, endpoint)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Returns the appropriate CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ApiError::Network { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors returned by [`TaskNotesClient`](crate::client::TaskNotesClient).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered with an error status.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// The HTTP request could not be built or sent.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// The response envelope reported `success: false`.
    #[error("server error: {message}")]
    Envelope { message: String },

    /// The configured base URL cannot address API endpoints.
    #[error("invalid API URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if the server lacks the endpoint (404, 405 or 501).
    ///
    /// Used to fall back to client-side evaluation of filter queries.
    pub fn is_unsupported(&self) -> bool {
        match self {
            Error::Api(ApiError::Unsupported { .. }) | Error::Api(ApiError::NotFound { .. }) => {
                true
            }
            Error::Api(ApiError::Http { status, .. }) => matches!(status, 404 | 405 | 501),
            _ => false,
        }
    }

    /// Returns the appropriate CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Api(api) => api.exit_code(),
            Error::Http(e) if e.is_connect() || e.is_timeout() => 3,
            _ => 2,
        }
    }
}
