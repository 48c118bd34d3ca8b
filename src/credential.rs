//! Upstream credential
//!
//! The API key is resolved once at startup from the process environment and
//! then handed to the upstream client. It never comes from request data,
//! is never serialized, and redacts itself in `Debug` output.

use crate::error::{AppError, AppResult};
use axum::http::HeaderValue;
use std::fmt;

/// Bearer token for the upstream chat-completion API
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap an already-resolved key
    ///
    /// Returns `None` for an empty or whitespace-only key, or one that cannot
    /// be sent as a bearer token.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() || !is_sendable(&key) {
            None
        } else {
            Some(Self(key))
        }
    }

    /// Read the key from the process environment
    pub fn from_env(var: &str) -> AppResult<Self> {
        Self::from_lookup(var, |name| std::env::var(name).ok())
    }

    /// Read the key through `lookup`
    ///
    /// Fails if the variable is absent or empty, or if its value is not a
    /// valid `Authorization` header value. Errors name the variable, never
    /// the value.
    pub fn from_lookup<F>(var: &str, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::MissingCredential {
                var: var.to_string(),
            })?;
        Self::new(key).ok_or_else(|| AppError::InvalidCredential {
            var: var.to_string(),
        })
    }

    /// The raw key, for building the `Authorization` header only
    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

/// reqwest rejects a bearer token that is not a valid header value at send time
fn is_sendable(key: &str) -> bool {
    HeaderValue::from_str(&format!("Bearer {key}")).is_ok()
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}
