//! 审计日志模块
//!
//! 管理操作的只追加记录：状态变更、硬删除、设置修改。
//! 条目一旦写入不再更新或删除；序列号来自 redb 计数器。

pub mod storage;
pub mod types;

pub use storage::{AuditStorage, AuditStorageError};
pub use types::{AuditAction, AuditEntry, AuditListResponse, AuditQuery};
