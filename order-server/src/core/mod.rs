//! 核心模块 - 服务器配置、状态和 HTTP 服务
//!
//! # 模块结构
//!
//! - [`Config`] - 服务器配置
//! - [`SettingsService`] - 门店设置（持久化单例）
//! - [`ServerState`] - 服务器状态
//! - [`Server`] - HTTP 服务器

pub mod config;
pub mod server;
pub mod settings;
pub mod state;

pub use config::Config;
pub use server::{build_app, Server};
pub use settings::SettingsService;
pub use state::ServerState;
