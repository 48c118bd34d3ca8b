//! chatrelay - single-endpoint chat relay for OpenRouter-compatible APIs
//!
//! Accepts `{ "message": ... }`, forwards it upstream with a server-held
//! credential, and returns `{ "reply": ... }`. The relay core in [`relay`]
//! is hosted either by the HTTP server in [`handlers`] or run once per
//! process by [`invocation`].

pub mod cli;
pub mod config;
pub mod credential;
pub mod error;
pub mod handlers;
pub mod invocation;
pub mod middleware;
pub mod relay;
pub mod telemetry;
pub mod upstream;
