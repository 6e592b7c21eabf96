//! 统一错误处理
//!
//! 提供应用级错误类型和错误响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`ErrorBody`] - 失败响应 JSON 结构
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E0xxx | 业务逻辑错误 | E0003 资源不存在 |
//! | E2xxx | 权限错误 | E2001 无权限 |
//! | E3xxx | 认证令牌错误 | E3002 无效令牌 |
//! | E9xxx | 系统错误 | E9002 数据库错误 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// 失败响应结构
///
/// ```json
/// { "code": "E0003", "message": "Product not found" }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// 错误码
    pub code: &'static str,
    /// 消息
    pub message: String,
}

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证错误 (4xx) ==========
    #[error("Authentication required")]
    /// 未登录 (401)
    Unauthorized,

    #[error("Token expired")]
    /// 令牌过期 (401)
    TokenExpired,

    #[error("Invalid token")]
    /// 无效令牌 (401)
    InvalidToken,

    #[error("Permission denied: {0}")]
    /// 无权限 (403)
    Forbidden(String),

    // ========== 业务逻辑错误 (4xx) ==========
    #[error("{0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("{0}")]
    /// 资源冲突 (400)
    Conflict(String),

    #[error("{0}")]
    /// 验证失败 (400)
    Validation(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Not enough inventory")]
    /// 库存不足 (500)
    InsufficientInventory,

    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", self.to_string()),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", self.to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "E3002", self.to_string()),

            // Authorization errors (403)
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "E2001", self.to_string()),

            // Not found (404)
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "E0003", self.to_string()),

            // Duplicate SKU/slug is a client mistake under the storefront contract, so 400 rather than 409
            AppError::Conflict(_) => (StatusCode::BAD_REQUEST, "E0004", self.to_string()),

            // Validation (400)
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "E0002", self.to_string()),

            // Inventory shortfall carries no call-site status and falls through as a server error
            AppError::InsufficientInventory => {
                (StatusCode::INTERNAL_SERVER_ERROR, "E0005", self.to_string())
            }

            // Database errors (500) - detail goes to the log, not the client
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                )
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { code, message })).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn invalid_token() -> Self {
        Self::InvalidToken
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::InsufficientInventory => AppError::InsufficientInventory,
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for handlers
pub type AppResult<T> = Result<T, AppError>;
