//! Order Core
//!
//! 订单领域核心，由四个部分组成：
//!
//! - **totals**: 纯函数金额计算（小计 / 配送费 / 总计）
//! - **access**: 角色门控（查看 / 状态变更 / 硬删除）
//! - **lifecycle**: 状态机（终态拒绝、幂等空转换、宽松的非终态移动）
//! - **store**: redb 持久层（`OrderStore` trait + 参考实现）
//!
//! # Data Flow
//!
//! ```text
//! NewOrderRequest → compute_totals → OrderStore::create (status = pending)
//!                                          ↓
//! admin PUT /status → lifecycle::transition → OrderStore::update_status
//!                                          ↓
//!                              audit entry + best-effort notification
//! ```

pub mod access;
pub mod lifecycle;
pub mod store;
pub mod totals;

pub use lifecycle::{transition, TransitionOutcome};
pub use store::{NewOrder, OrderStorage, OrderStore, StorageError, StorageResult};
pub use totals::{compute_totals, Totals};

use shared::OrderStatus;

use crate::utils::AppError;

/// Domain errors raised by the order core.
///
/// Converted into [`AppError`] at the API boundary.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Invalid line item: {0}")]
    InvalidLineItem(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order {id} is {status} and cannot leave that state")]
    IllegalTransition { id: String, status: OrderStatus },

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            e @ OrderError::InvalidLineItem(_) => AppError::Validation(e.to_string()),
            e @ OrderError::OrderNotFound(_) => AppError::NotFound(e.to_string()),
            e @ OrderError::IllegalTransition { .. } => AppError::BusinessRule(e.to_string()),
            OrderError::Forbidden(msg) => AppError::Forbidden(msg),
            OrderError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}
