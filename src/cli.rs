//! Command-line interface for chatrelay
//!
//! Provides argument parsing and subcommand handling for the chatrelay binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Relay chat messages to an OpenRouter-compatible API
#[derive(Parser)]
#[command(name = "chatrelay")]
#[command(version)]
#[command(about = "Relay chat messages to an OpenRouter-compatible API")]
#[command(
    long_about = "chatrelay accepts a chat message, attaches the server-held API key, \
    forwards it to an OpenRouter-compatible chat-completion API and returns the reply. \
    It runs either as a long-running HTTP server or once per invocation."
)]
pub struct Cli {
    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Relay a single request and write a CGI-style response to stdout
    Invoke {
        /// HTTP method of the request
        #[arg(short, long, env = "REQUEST_METHOD", default_value = "POST")]
        method: String,
        /// JSON request body (read from stdin if not specified)
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# chatrelay Configuration
# ========================
#
# Every section is optional. The API key is never read from this file:
# export it in the environment variable named by upstream.api_key_env
# (or put it in a .env file next to the binary).

# ─────────────────────────────────────────────────────────────────────────────
# SERVER CONFIGURATION (long-running mode)
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on (the PORT environment variable overrides this)
port = 3000

# Origins allowed to call /chat from a browser. Empty allows any origin.
cors_allowed_origins = []

# ─────────────────────────────────────────────────────────────────────────────
# UPSTREAM CHAT-COMPLETION API
# ─────────────────────────────────────────────────────────────────────────────

[upstream]
# API base URL; requests go to <base_url>/chat/completions
base_url = "https://openrouter.ai/api/v1"

# Model identifier sent with every request
model = "mistralai/mistral-7b-instruct:free"

# Environment variable holding the API key (startup fails if it is unset)
api_key_env = "OPENROUTER_API_KEY"

# Optional app attribution headers (HTTP-Referer and X-Title)
# referer = "https://your-site.example"
# title = "Your Chat App"

# Optional request timeout in seconds, 1-300. Unset means no timeout.
# timeout_seconds = 60

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error" (RUST_LOG overrides)
log_level = "info"
"#
}
