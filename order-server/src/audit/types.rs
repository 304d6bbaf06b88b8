//! 审计日志类型定义

use serde::{Deserialize, Serialize};

/// 审计操作类型（枚举，非自由文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// 订单状态变更
    OrderStatusChanged,
    /// 订单硬删除
    OrderDeleted,
    /// 门店设置变更
    SettingsUpdated,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 审计日志条目（不可变）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// 全局递增序列号（唯一标识）
    pub id: u64,
    /// 时间戳（Unix 毫秒）
    pub timestamp: i64,
    /// 操作类型
    pub action: AuditAction,
    /// 资源类型（如 "order", "settings"）
    pub entity_type: String,
    /// 资源 ID（设置变更等单例资源为 None）
    pub entity_id: Option<String>,
    /// 操作管理员 ID
    pub admin_id: String,
    /// 操作管理员名称
    pub admin_name: Option<String>,
    /// 结构化详情（JSON）
    pub details: serde_json::Value,
}

/// 审计日志查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuery {
    /// 起始时间（Unix 毫秒，含）
    pub from: Option<i64>,
    /// 截止时间（Unix 毫秒，含）
    pub to: Option<i64>,
    /// 操作类型过滤
    pub action: Option<AuditAction>,
    /// 操作管理员过滤
    pub admin_id: Option<String>,
    /// 分页偏移
    #[serde(default)]
    pub offset: usize,
    /// 分页大小（默认 50）
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            action: None,
            admin_id: None,
            offset: 0,
            limit: default_limit(),
        }
    }
}

/// 审计日志列表响应
#[derive(Debug, Serialize)]
pub struct AuditListResponse {
    pub items: Vec<AuditEntry>,
    pub total: u64,
}
