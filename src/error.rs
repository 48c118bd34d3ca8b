//! Error types for chatrelay
//!
//! `AppError` covers startup and configuration failures, which are fatal.
//! `RelayError` and `UpstreamError` cover a single relayed request; they are
//! converted into a `RelayResponse` at the relay boundary and never leak
//! their details to the caller.

use axum::http::StatusCode;
use thiserror::Error;

/// Body returned with 405 responses
pub const METHOD_NOT_ALLOWED_BODY: &str = "Method Not Allowed";

/// Error message returned when the inbound message is missing or empty
pub const MESSAGE_REQUIRED: &str = "Message is required.";

/// Error message returned for every upstream or processing failure
pub const UPSTREAM_FAILURE: &str = "Failed to get response from AI.";

/// Startup and configuration errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read configuration file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error(
        "Missing upstream credential: environment variable {var} is not set or empty. \
        Export it (or add it to .env) before starting chatrelay."
    )]
    MissingCredential { var: String },

    #[error(
        "Invalid upstream credential: environment variable {var} does not hold a value \
        that can be sent in an Authorization header"
    )]
    InvalidCredential { var: String },

    #[error("Failed to build upstream HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;

/// Failures of the outbound chat-completion call
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Request to upstream failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Request to upstream timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode upstream response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Upstream response contained no choices")]
    EmptyChoices,

    #[error("Upstream response's first choice has no message content")]
    MissingContent,
}

impl UpstreamError {
    /// Classify a reqwest error from `send()`
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Transport(err)
        }
    }
}

/// Per-request failures of the relay
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Method {method} not allowed")]
    MethodNotAllowed { method: String },

    #[error("Request has no message")]
    MissingMessage,

    #[error("Malformed request body: {0}")]
    MalformedRequest(#[source] serde_json::Error),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl RelayError {
    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingMessage => StatusCode::BAD_REQUEST,
            Self::MalformedRequest(_) | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller-facing message. Never includes the underlying cause.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed { .. } => METHOD_NOT_ALLOWED_BODY,
            Self::MissingMessage => MESSAGE_REQUIRED,
            Self::MalformedRequest(_) | Self::Upstream(_) => UPSTREAM_FAILURE,
        }
    }
}
