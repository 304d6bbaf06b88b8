use std::sync::Arc;

use crate::audit::AuditStorage;
use crate::auth::JwtService;
use crate::core::{Config, SettingsService};
use crate::notify::{LogChannel, NotificationChannel, NotificationService, WebhookChannel};
use crate::orders::store::{OrderStorage, OrderStore};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc\<dyn OrderStore\> | 订单存储 (redb 参考实现，可替换) |
/// | audit | AuditStorage | 只追加审计日志 |
/// | settings | SettingsService | 门店设置 |
/// | notifier | NotificationService | 客户通知分发 |
/// | jwt_service | Arc\<JwtService\> | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 订单存储
    pub store: Arc<dyn OrderStore>,
    /// 审计日志
    pub audit: AuditStorage,
    /// 门店设置
    pub settings: SettingsService,
    /// 客户通知分发
    pub notifier: NotificationService,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替；测试用它注入自定义组件
    /// （内存存储、记录型通知渠道）。
    pub fn new(
        config: Config,
        store: Arc<dyn OrderStore>,
        audit: AuditStorage,
        settings: SettingsService,
        notifier: NotificationService,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            config,
            store,
            audit,
            settings,
            notifier,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 订单数据库 (work_dir/database/orders.redb)
    /// 3. 审计日志和门店设置（共享同一数据库句柄）
    /// 4. 通知渠道（配置了 webhook 用 webhook，否则只打日志）
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("orders.redb");
        let storage = OrderStorage::open(&db_path).expect("Failed to open order database");
        let db = storage.database();

        let audit = AuditStorage::new(db.clone()).expect("Failed to open audit log");
        let settings = SettingsService::new(db, config.default_store_settings())
            .expect("Failed to open store settings");

        let channel: Arc<dyn NotificationChannel> = match &config.notify_webhook_url {
            Some(url) => Arc::new(WebhookChannel::new(url.clone())),
            None => Arc::new(LogChannel),
        };
        let notifier = NotificationService::new(channel);

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self::new(
            config.clone(),
            Arc::new(storage),
            audit,
            settings,
            notifier,
            jwt_service,
        )
    }

    /// 内存态服务器状态（测试和本地演示）
    pub fn in_memory(config: Config, channel: Arc<dyn NotificationChannel>) -> Self {
        let storage = OrderStorage::open_in_memory().expect("Failed to open in-memory database");
        let db = storage.database();

        let audit = AuditStorage::new(db.clone()).expect("Failed to open audit log");
        let settings = SettingsService::new(db, config.default_store_settings())
            .expect("Failed to open store settings");
        let notifier = NotificationService::new(channel);
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self::new(
            config,
            Arc::new(storage),
            audit,
            settings,
            notifier,
            jwt_service,
        )
    }

    /// 获取 JWT 服务
    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
