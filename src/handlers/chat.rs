//! Chat endpoint handler
//!
//! Adapts `/chat` requests onto [`crate::relay::handle`].

use crate::handlers::AppState;
use crate::middleware::RequestId;
use crate::relay::{self, RelayResponse};
use axum::{Extension, body::Bytes, extract::State, http::Method};
use tracing::Instrument;

/// `/chat` handler (any method)
///
/// Latency is dominated by the single upstream call; there is no retry, so
/// the worst case is the configured upstream timeout (or the transport's own
/// limit when none is configured).
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    method: Method,
    body: Bytes,
) -> RelayResponse {
    let span = tracing::info_span!("relay", request_id = %request_id);
    relay::handle(&method, &body, state.relay())
        .instrument(span)
        .await
}
