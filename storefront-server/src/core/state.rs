//! 服务器状态
//!
//! [`ServerState`] 在 handler 之间共享, clone 成本很低 (连接池与 Arc)。

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::auth::password::hash_password;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;

/// Admin login resolved from configuration
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

/// 服务器状态
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    pub admin: Arc<AdminCredentials>,
}

impl ServerState {
    /// Open the database and build every service from `config`
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path).await?;
        Self::with_pool(config.clone(), db.pool)
    }

    /// Build state around an existing pool (tests use an in-memory one)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Result<Self> {
        let jwt_service = JwtService::with_config(config.jwt_config()?)
            .map_err(|e| ServerError::Config(e.to_string()))?;
        let admin = resolve_admin(&config)?;

        Ok(Self {
            config: Arc::new(config),
            pool,
            jwt_service: Arc::new(jwt_service),
            admin: Arc::new(admin),
        })
    }
}

fn resolve_admin(config: &Config) -> Result<AdminCredentials> {
    let password_hash = match &config.admin_password_hash {
        Some(hash) => hash.clone(),
        None if !config.is_development() => {
            return Err(ServerError::Config(format!(
                "ADMIN_PASSWORD_HASH must be set outside development (ENVIRONMENT={})",
                config.environment
            )));
        }
        None => {
            tracing::warn!(
                username = %config.admin_username,
                "ADMIN_PASSWORD_HASH not set, using development password 'admin'"
            );
            hash_password("admin").map_err(|e| ServerError::Config(e.to_string()))?
        }
    };
    Ok(AdminCredentials {
        username: config.admin_username.clone(),
        password_hash,
    })
}
