//! Relay core
//!
//! [`handle`] is the whole request path: check the method, validate the
//! message, forward it upstream, and map the outcome to a status and body.
//! It knows nothing about how it is hosted; the server in
//! [`crate::handlers`] and the one-shot runner in [`crate::invocation`] are
//! thin adapters around it.

use crate::config::Config;
use crate::credential::ApiKey;
use crate::error::{AppResult, METHOD_NOT_ALLOWED_BODY, RelayError};
use crate::upstream::UpstreamClient;
use axum::{
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Immutable per-process relay state
///
/// Built once at startup and passed explicitly to every invocation of
/// [`handle`]. Holds no mutable state, so concurrent requests need no locking.
#[derive(Debug, Clone)]
pub struct Relay {
    upstream: UpstreamClient,
}

impl Relay {
    /// Create a relay around an upstream client
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    /// Build the upstream client from configuration and a resolved credential
    pub fn from_config(config: &Config, api_key: ApiKey) -> AppResult<Self> {
        let upstream = UpstreamClient::new(&config.upstream, api_key)?;
        Ok(Self::new(upstream))
    }

    /// Get reference to the upstream client
    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }
}

/// Inbound request body: `{ "message": string }`
#[derive(Debug, Deserialize)]
struct InboundRequest {
    #[serde(default)]
    message: Option<Value>,
}

impl InboundRequest {
    /// Parse a raw body. An empty body is treated as `{}`.
    fn parse(body: &[u8]) -> Result<Self, RelayError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self { message: None });
        }
        serde_json::from_slice(body).map_err(RelayError::MalformedRequest)
    }

    /// The message to forward
    ///
    /// Absent and falsy values (`null`, `""`, `false`, `0`) are a missing
    /// message. Any other string is forwarded verbatim; any other type is a
    /// malformed request.
    fn into_message(self) -> Result<String, RelayError> {
        match self.message {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Err(RelayError::MissingMessage),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(RelayError::MissingMessage),
            Some(Value::String(message)) if message.is_empty() => Err(RelayError::MissingMessage),
            Some(Value::String(message)) => Ok(message),
            Some(other) => serde_json::from_value(other).map_err(RelayError::MalformedRequest),
        }
    }
}

/// Body of a relay response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// `{"reply": ...}`
    Reply(String),
    /// `{"error": ...}`
    Error(&'static str),
    /// Plain text
    Text(&'static str),
}

impl ResponseBody {
    /// MIME type of the serialized body
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Reply(_) | Self::Error(_) => "application/json",
            Self::Text(_) => "text/plain; charset=utf-8",
        }
    }

    /// Serialized body
    pub fn to_body_string(&self) -> String {
        match self {
            Self::Reply(reply) => json!({ "reply": reply }).to_string(),
            Self::Error(error) => json!({ "error": error }).to_string(),
            Self::Text(text) => (*text).to_string(),
        }
    }
}

/// Status code and body produced by [`handle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    status: StatusCode,
    body: ResponseBody,
}

impl RelayResponse {
    /// Successful reply
    pub fn reply(reply: String) -> Self {
        Self {
            status: StatusCode::OK,
            body: ResponseBody::Reply(reply),
        }
    }

    /// Get the HTTP status
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the response body
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }
}

impl From<RelayError> for RelayResponse {
    fn from(err: RelayError) -> Self {
        let body = match &err {
            RelayError::MethodNotAllowed { .. } => ResponseBody::Text(METHOD_NOT_ALLOWED_BODY),
            _ => ResponseBody::Error(err.public_message()),
        };
        Self {
            status: err.status(),
            body,
        }
    }
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.body.content_type())],
            self.body.to_body_string(),
        )
            .into_response()
    }
}

/// Relay one request
///
/// Never fails: every error is logged here and mapped to its response.
/// Upstream details stay in the log and never reach the returned body.
pub async fn handle(method: &Method, body: &[u8], relay: &Relay) -> RelayResponse {
    match relay_message(method, body, relay).await {
        Ok(reply) => {
            tracing::info!(reply_length = reply.len(), "Relayed reply from upstream");
            RelayResponse::reply(reply)
        }
        Err(err) => {
            match &err {
                RelayError::MethodNotAllowed { method } => {
                    tracing::debug!(method = %method, "Rejected non-POST request");
                }
                RelayError::MissingMessage => {
                    tracing::warn!("Rejected request without a message");
                }
                RelayError::MalformedRequest(_) | RelayError::Upstream(_) => {
                    tracing::error!(error = %err, "Failed to get response from upstream");
                }
            }
            RelayResponse::from(err)
        }
    }
}

async fn relay_message(method: &Method, body: &[u8], relay: &Relay) -> Result<String, RelayError> {
    if method != Method::POST {
        return Err(RelayError::MethodNotAllowed {
            method: method.to_string(),
        });
    }

    let message = InboundRequest::parse(body)?.into_message()?;

    tracing::debug!(
        message_length = message.len(),
        model = %relay.upstream().model(),
        "Forwarding message upstream"
    );

    Ok(relay.upstream().complete(&message).await?)
}
