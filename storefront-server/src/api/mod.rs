//! API 路由模块
//!
//! 每个子模块提供 `router()`, 由 [`crate::services::https::build_app`] 合并。
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 管理员登录
//! - [`menu`] - 店面菜单和定制视图
//! - [`cart`] - 购物车计价
//! - [`checkout`] - 下单
//! - [`categories`] - 分类管理接口
//! - [`items`] - 商品管理接口
//! - [`customizations`] - 定制组/选项管理接口
//! - [`orders`] - 订单管理接口
//! - [`settings`] - 设置管理接口

pub mod auth;
pub mod health;

// Storefront
pub mod cart;
pub mod checkout;
pub mod menu;

// Admin data APIs
pub mod categories;
pub mod customizations;
pub mod items;
pub mod orders;
pub mod settings;
