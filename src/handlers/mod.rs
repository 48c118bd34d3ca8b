//! HTTP handlers for the long-running chatrelay server

use crate::config::ServerConfig;
use crate::middleware::{cors_layer, request_id_middleware};
use crate::relay::Relay;
use axum::{
    Router, middleware,
    routing::{any, get},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod chat;
pub mod health;

/// Application state shared across all handlers
///
/// The relay is immutable and Arc'd for cheap cloning across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    relay: Arc<Relay>,
}

impl AppState {
    /// Create a new AppState around a relay
    pub fn new(relay: Relay) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }

    /// Get reference to the relay
    pub fn relay(&self) -> &Relay {
        &self.relay
    }
}

/// Build the application router
///
/// `/chat` accepts every method so that non-POST requests get the relay's
/// own 405 body instead of Axum's empty one.
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/chat", any(chat::handler))
        .route("/health", get(health::handler))
        .with_state(state)
        .layer(cors_layer(&server.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::credential::ApiKey;

    fn create_test_state() -> AppState {
        let config = Config::default();
        let relay = Relay::from_config(&config, ApiKey::new("sk-test").unwrap())
            .expect("relay should build");
        AppState::new(relay)
    }

    #[test]
    fn test_appstate_is_clonable() {
        let state = create_test_state();
        let state2 = state.clone();
        assert_eq!(
            state2.relay().upstream().model(),
            state.relay().upstream().model()
        );
    }

    #[test]
    fn test_appstate_shares_relay() {
        let state = create_test_state();
        let state2 = state.clone();
        assert!(Arc::ptr_eq(&state.relay, &state2.relay));
    }
}
