//! 服务器配置
//!
//! # 环境变量
//!
//! 所有配置项都可以通过环境变量覆盖：
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | WORK_DIR | /var/lib/reef/store | 工作目录 |
//! | HTTP_PORT | 5000 | HTTP 服务端口 |
//! | ENVIRONMENT | development | 运行环境 |
//! | CATEGORY_DELETE_POLICY | restrict | 分类删除策略 (restrict \| orphan) |
//!
//! # 示例
//!
//! ```ignore
//! WORK_DIR=/data/reef HTTP_PORT=8080 cargo run
//! ```

use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::utils::AppError;

/// 删除被商品引用的分类时的策略
///
/// 上游数据模型未定义级联规则，这里作为显式配置项暴露。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryDeletePolicy {
    /// 仍被商品引用的分类拒绝删除
    Restrict,
    /// 直接删除，商品上的引用悬空 (读取端渲染为 null)
    Orphan,
}

impl CategoryDeletePolicy {
    fn from_env_value(value: &str) -> Self {
        match value {
            "orphan" => Self::Orphan,
            _ => Self::Restrict,
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 分类删除策略
    pub category_delete_policy: CategoryDeletePolicy,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/reef/store".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            category_delete_policy: std::env::var("CATEGORY_DELETE_POLICY")
                .map(|v| CategoryDeletePolicy::from_env_value(&v))
                .unwrap_or(CategoryDeletePolicy::Restrict),
        }
    }

    /// 数据库文件目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> Result<(), AppError> {
        std::fs::create_dir_all(self.database_dir())
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))
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
