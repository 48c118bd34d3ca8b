//! Upstream chat-completion client
//!
//! Wraps a `reqwest::Client` built once at startup. Each call sends a single
//! user message and returns the first choice's content. There is no retry:
//! any failure is returned to the relay, which maps it to the generic 500.

pub mod types;

use crate::config::UpstreamConfig;
use crate::credential::ApiKey;
use crate::error::{AppError, AppResult, UpstreamError};
use std::time::Duration;
use types::{ChatCompletionRequest, ChatCompletionResponse};

/// Header carrying the calling site's URL (OpenRouter app attribution)
pub const REFERER_HEADER: &str = "HTTP-Referer";

/// Header carrying the calling app's display name (OpenRouter app attribution)
pub const TITLE_HEADER: &str = "X-Title";

/// Maximum number of characters of an upstream error body kept for logs
const MAX_LOGGED_BODY_CHARS: usize = 512;

/// Most bytes read from an error body (enough for `MAX_LOGGED_BODY_CHARS` UTF-8 chars)
const MAX_LOGGED_BODY_BYTES: usize = MAX_LOGGED_BODY_CHARS * 4;

/// Client for an OpenRouter-compatible chat-completion endpoint
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    completions_url: String,
    model: String,
    referer: Option<String>,
    title: Option<String>,
    api_key: ApiKey,
}

impl UpstreamClient {
    /// Build a client from validated configuration and a resolved credential
    pub fn new(config: &UpstreamConfig, api_key: ApiKey) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let http = builder.build().map_err(AppError::HttpClient)?;

        Ok(Self {
            http,
            completions_url: config.completions_url(),
            model: config.model().to_string(),
            referer: config.referer().map(str::to_string),
            title: config.title().map(str::to_string),
            api_key,
        })
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL requests are posted to
    pub fn completions_url(&self) -> &str {
        &self.completions_url
    }

    /// Send `message` as a single user turn and return the reply text
    pub async fn complete(&self, message: &str) -> Result<String, UpstreamError> {
        let payload = ChatCompletionRequest::single_user_message(&self.model, message);

        let mut request = self
            .http
            .post(&self.completions_url)
            .bearer_auth(self.api_key.expose())
            .json(&payload);
        if let Some(referer) = &self.referer {
            request = request.header(REFERER_HEADER, referer);
        }
        if let Some(title) = &self.title {
            request = request.header(TITLE_HEADER, title);
        }

        let started = std::time::Instant::now();
        let response = request.send().await.map_err(UpstreamError::from_send)?;
        let status = response.status();

        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            model = %self.model,
            "Upstream responded"
        );

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: read_error_body(response).await,
            });
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(UpstreamError::Decode)?;
        completion.into_reply()
    }
}

/// Read at most `MAX_LOGGED_BODY_BYTES` of an error body for the log line
///
/// A failure to read the body just ends the read early.
async fn read_error_body(mut response: reqwest::Response) -> String {
    let mut buf = Vec::new();
    while buf.len() < MAX_LOGGED_BODY_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(MAX_LOGGED_BODY_BYTES - buf.len());
                buf.extend_from_slice(&chunk[..take]);
            }
            Ok(None) | Err(_) => break,
        }
    }
    truncate_for_log(&String::from_utf8_lossy(&buf))
}

/// Truncate an upstream body to `MAX_LOGGED_BODY_CHARS` characters
fn truncate_for_log(body: &str) -> String {
    match body.char_indices().nth(MAX_LOGGED_BODY_CHARS) {
        Some((idx, _)) => format!("{}... [truncated]", &body[..idx]),
        None => body.to_string(),
    }
}
