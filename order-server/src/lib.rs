//! Forno Order Server - 披萨店在线订餐服务端
//!
//! # 架构概述
//!
//! 本模块是 Order Server 的主入口，提供以下核心功能：
//!
//! - **订单核心** (`orders`): 金额计算、访问控制、生命周期状态机、redb 存储
//! - **通知** (`notify`): 订单生命周期的 best-effort 客户通知
//! - **审计** (`audit`): 管理操作的只追加审计日志
//! - **认证** (`auth`): JWT 验证（身份由外部认证方签发）
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、设置、HTTP 服务
//! ├── auth/          # JWT 验证、当前用户
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单核心（totals / access / lifecycle / store）
//! ├── notify/        # 客户通知分发
//! ├── audit/         # 审计日志
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod notify;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{build_app, Config, Server, ServerState};
pub use notify::NotificationService;
pub use orders::{OrderStorage, OrderStore};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ______
   / ____/___  _________  ____
  / /_  / __ \/ ___/ __ \/ __ \
 / __/ / /_/ / /  / / / / /_/ /
/_/    \____/_/  /_/ /_/\____/
    "#
    );
}
