//! Per-invocation adapter
//!
//! Runs the relay exactly once per process, CGI style: the method comes from
//! the command line (or `REQUEST_METHOD`), the body from `--body` or stdin,
//! and the response is written to stdout as a status line, a content type
//! and the body. Logs go to stderr so stdout carries only the response.

use crate::error::{AppError, AppResult};
use crate::relay::{self, Relay, RelayResponse};
use axum::http::{Method, StatusCode};
use std::io::Write;

/// Parse an HTTP method token as given on the command line
pub fn parse_method(raw: &str) -> AppResult<Method> {
    Method::from_bytes(raw.trim().as_bytes())
        .map_err(|_| AppError::Config(format!("'{}' is not a valid HTTP method", raw)))
}

/// Render a relay response in CGI response format
pub fn render(response: &RelayResponse) -> String {
    let status = response.status();
    format!(
        "Status: {} {}\r\nContent-Type: {}\r\n\r\n{}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default(),
        response.body().content_type(),
        response.body().to_body_string()
    )
}

/// Relay one request and write the rendered response to `out`
pub async fn run<W: Write>(
    method: &Method,
    body: &[u8],
    relay: &Relay,
    out: &mut W,
) -> std::io::Result<StatusCode> {
    let response = relay::handle(method, body, relay).await;
    out.write_all(render(&response).as_bytes())?;
    out.flush()?;
    Ok(response.status())
}
