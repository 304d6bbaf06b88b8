//! Store Settings API Module

mod handler;

use axum::{
    routing::get,
    Router,
};

use crate::core::ServerState;

/// Settings router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/settings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::get).put(handler::update))
}
