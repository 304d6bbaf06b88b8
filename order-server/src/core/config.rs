use std::path::PathBuf;

use shared::StoreSettings;

use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/forno | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | NOTIFY_WEBHOOK_URL | (unset) | 通知网关 webhook，未设置时仅打日志 |
/// | DELIVERY_FEE | 3.99 | 配送费默认值（首次启动种子） |
/// | SEND_CUSTOMER_NOTIFICATIONS | true | 通知开关默认值（首次启动种子） |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/forno HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 通知网关 webhook 地址
    pub notify_webhook_url: Option<String>,
    /// 配送费默认值（仅用于首次启动时种子化门店设置）
    pub default_delivery_fee: f64,
    /// 通知开关默认值（仅用于首次启动时种子化门店设置）
    pub default_send_notifications: bool,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/forno".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            notify_webhook_url: std::env::var("NOTIFY_WEBHOOK_URL").ok(),
            default_delivery_fee: std::env::var("DELIVERY_FEE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3.99),
            default_send_notifications: std::env::var("SEND_CUSTOMER_NOTIFICATIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 首次启动时种子化的门店设置
    pub fn default_store_settings(&self) -> StoreSettings {
        StoreSettings {
            send_customer_notifications: self.default_send_notifications,
            delivery_fee: self.default_delivery_fee,
        }
    }

    /// 数据库目录: work_dir/database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录: work_dir/logs
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
