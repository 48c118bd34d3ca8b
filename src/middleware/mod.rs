//! HTTP middleware for the long-running server

pub mod cors;
pub mod request_id;

pub use cors::cors_layer;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
