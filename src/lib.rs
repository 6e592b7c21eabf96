//! Reef Store - 电商目录服务
//!
//! # 架构概述
//!
//! 本模块是目录服务的主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储，商品与分类仓库
//! - **认证** (`auth`): JWT 路由守卫 (protect / admin)
//! - **HTTP API** (`api`): RESTful 商品目录接口
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、管理员守卫
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (模型、查询构建、仓库)
//! └── utils/         # 错误类型、日志
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, build_app};
pub use utils::{AppError, AppResult};

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

pub fn print_banner() {
    println!(
        r#"
    ____  ____________
   / __ \/ ____/ ____/ ____
  / /_/ / __/ / __/   / __/________  ________
 / _, _/ /___/ /___  _\ \/ __/ __ \/ ___/ _ \
/_/ |_/_____/_____/ /___/\__/\____/_/   \___/
    "#
    );
}
