//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`products`] - 商品目录接口
//! - [`categories`] - 分类管理接口

pub mod categories;
pub mod health;
pub mod products;

/// Confirmation body for deletes
#[derive(Debug, serde::Serialize)]
pub struct Removed {
    pub message: &'static str,
}
