//! Audit Log API Module

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

/// Audit log router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/audit", get(handler::list))
}
