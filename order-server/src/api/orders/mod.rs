//! Order API Module
//!
//! 下单、查询、状态流转、硬删除。
//! 角色门控在 handler 内通过 `orders::access` 完成：
//! 顾客只能看到自己的订单，状态流转是管理员操作，
//! 硬删除仅限 admin_master。

mod handler;

use axum::{
    routing::{get, put},
    Router,
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).delete(handler::hard_delete))
        .route("/{id}/status", put(handler::update_status))
}
