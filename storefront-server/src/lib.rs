//! Slice Storefront Server - 披萨店在线点餐后端
//!
//! # 架构概述
//!
//! - **定制引擎** (`customization`): 选项校验与计价
//! - **购物车** (`cart`): 服务端计价、税费、配送费
//! - **订单** (`orders`): 下单事务与状态流转
//! - **数据库** (`db`): SQLite (sqlx) 连接池、迁移和 repository
//! - **认证** (`auth`): 管理员 JWT + Argon2
//! - **HTTP API** (`api`): RESTful API 接口
//! - **维护** (`maintenance`): seed / 去重 / 备份恢复 / 重建 slug
//!
//! # 模块结构
//!
//! ```text
//! storefront-server/src/
//! ├── core/           # 配置、状态、错误、服务器
//! ├── auth/           # JWT 认证
//! ├── services/       # HTTP 服务 (路由 + 中间件)
//! ├── api/            # HTTP 路由和处理器
//! ├── customization/  # 定制校验与计价
//! ├── cart/           # 购物车计价
//! ├── orders/         # 下单与订单生命周期
//! ├── menu/           # 店面菜单视图
//! ├── maintenance/    # 运维任务 (CLI 使用)
//! ├── utils/          # 错误、日志、校验、金额
//! └── db/             # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod cart;
pub mod core;
pub mod customization;
pub mod db;
pub mod maintenance;
pub mod menu;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

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
   _____ ___
  / ___// (_)_______
  \__ \/ / / ___/ _ \
 ___/ / / / /__/  __/
/____/_/_/\___/\___/
    "#
    );
}
