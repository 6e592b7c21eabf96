//! 认证模块
//!
//! JWT 令牌服务与路由守卫中间件。

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
