//! 认证授权模块
//!
//! 提供 JWT 认证和当前用户上下文：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文（extractor 注入）
//!
//! 用户管理（注册、登录、密码）不在本服务范围内：
//! 身份由外部认证方签发的 JWT 提供，这里只做验证和解析。

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
