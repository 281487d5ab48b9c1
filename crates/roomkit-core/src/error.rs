//! Error types for Roomkit operations.
//!
//! The platform does not publish a structured error format of its own, so failures
//! are classified by HTTP status and transport condition. The same taxonomy is used
//! by every resource client in the workspace.

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Main error type for Roomkit operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The platform rejected the credentials (HTTP 401/403)
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized {
        /// 401 or 403
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Resource not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request was well-formed but failed server-side validation (HTTP 422),
    /// or a client-side validation check failed before sending
    #[error("Validation error: {message}")]
    Validation {
        /// HTTP status, absent for client-side checks
        status: Option<u16>,
        /// What failed
        message: String,
    },

    /// Conflicting state on the platform (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Too many requests (HTTP 429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Platform unreachable or temporarily unavailable (HTTP 502/503/504)
    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        /// HTTP status, absent for connect failures
        status: Option<u16>,
        /// Response body or transport error
        message: String,
    },

    /// Any other server-side failure (HTTP 5xx)
    #[error("Server error {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Any other HTTP or transport failure
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid resource identifier
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Invalid endpoint or resource path
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for Roomkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Serializable summary of an [`Error`], e.g. for forwarding to a UI or a log sink.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Stable code from [`Error::error_code`]
    pub code: &'static str,
    /// Display text of the error
    pub message: String,
    /// HTTP status the error was classified from, when there was one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Platform request id (`x-request-id`) of the failed call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl Error {
    /// Classify a non-success HTTP status returned by the platform.
    #[must_use]
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized {
                status: status.as_u16(),
                message,
            },
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::BAD_REQUEST => Self::BadRequest(message),
            StatusCode::UNPROCESSABLE_ENTITY => Self::Validation {
                status: Some(status.as_u16()),
                message,
            },
            StatusCode::CONFLICT => Self::Conflict(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited(message),
            StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => Self::ServiceUnavailable {
                status: Some(status.as_u16()),
                message,
            },
            status if status.is_server_error() => Self::Server {
                status: status.as_u16(),
                message,
            },
            status => Self::Http(format!("unexpected status {status}: {message}")),
        }
    }

    /// Client-side validation failure, raised before anything is sent.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            status: None,
            message: message.into(),
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::RateLimited(_) => "RATE_LIMITED",
            Self::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            Self::Server { .. } => "SERVER_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Http(_) => "HTTP_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidId(_) => "INVALID_ID",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Returns true if repeating the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_)
                | Self::ServiceUnavailable { .. }
                | Self::Server { .. }
                | Self::Timeout(_)
        )
    }

    /// Returns true for authentication failures.
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// HTTP status this error stands for, if it came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Validation { status, .. } | Self::ServiceUnavailable { status, .. } => *status,
            Self::NotFound(_) => Some(404),
            Self::BadRequest(_) => Some(400),
            Self::Conflict(_) => Some(409),
            Self::RateLimited(_) => Some(429),
            _ => None,
        }
    }

    /// Summarise the error for serialization.
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        self.into_error_response_with_id(None)
    }

    /// Summarise the error, attaching the platform request id.
    #[must_use]
    pub fn into_error_response_with_id(self, request_id: Option<String>) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code(),
            status: self.status(),
            message: self.to_string(),
            request_id,
        }
    }

    /// Whether the failure points at a bug or misconfiguration rather than a normal
    /// platform answer.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(self, Self::Server { .. } | Self::Config(_) | Self::Decode(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable {
                status: None,
                message: err.to_string(),
            }
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Self::InvalidId(err.to_string())
    }
}
