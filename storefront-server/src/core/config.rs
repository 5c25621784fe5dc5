use crate::auth::JwtConfig;
use crate::auth::jwt::{MIN_SECRET_LEN, generate_printable_secret};
use crate::core::ServerError;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (`.env` 由 `dotenv` 预先加载)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | DATABASE_PATH | {WORK_DIR}/storefront.db | SQLite 数据库文件 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | (EnvFilter 默认) | 日志级别 |
/// | LOG_DIR | (无) | 日志目录, 设置后按天滚动写文件 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | ADMIN_USERNAME | admin | 管理员用户名 |
/// | ADMIN_PASSWORD_HASH | (无) | 管理员密码 Argon2 PHC 哈希 |
/// | JWT_SECRET | (无) | JWT 密钥, 至少 32 字符 |
/// | JWT_EXPIRATION_MINUTES | 720 | 令牌有效期 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/slice HTTP_PORT=8080 cargo run -p storefront-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录, 存放数据库和日志
    pub work_dir: String,
    pub database_path: String,
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    pub admin_username: String,
    pub admin_password_hash: Option<String>,
    pub jwt_secret: Option<String>,
    pub jwt_expiration_minutes: i64,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let mut config = Self::with_work_dir(work_dir);

        if let Some(path) = env_opt("DATABASE_PATH") {
            config.database_path = path;
        }
        config.http_port = env_parse("HTTP_PORT", config.http_port);
        config.environment = std::env::var("ENVIRONMENT").unwrap_or(config.environment);
        config.log_level = env_opt("LOG_LEVEL");
        config.log_dir = env_opt("LOG_DIR");
        config.request_timeout_ms = env_parse("REQUEST_TIMEOUT_MS", config.request_timeout_ms);
        config.admin_username = std::env::var("ADMIN_USERNAME").unwrap_or(config.admin_username);
        config.admin_password_hash = env_opt("ADMIN_PASSWORD_HASH");
        config.jwt_secret = env_opt("JWT_SECRET");
        config.jwt_expiration_minutes =
            env_parse("JWT_EXPIRATION_MINUTES", config.jwt_expiration_minutes);
        config
    }

    /// Defaults rooted at `work_dir`, ignoring the environment
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let work_dir = work_dir.into();
        let database_path = std::path::Path::new(&work_dir)
            .join("storefront.db")
            .to_string_lossy()
            .into_owned();
        Self {
            work_dir,
            database_path,
            http_port: 3000,
            environment: "development".into(),
            log_level: None,
            log_dir: None,
            request_timeout_ms: 30_000,
            admin_username: "admin".into(),
            admin_password_hash: None,
            jwt_secret: None,
            jwt_expiration_minutes: 720,
        }
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// JWT 配置; 开发环境未设置密钥时生成临时密钥
    pub fn jwt_config(&self) -> Result<JwtConfig, ServerError> {
        let secret = match &self.jwt_secret {
            Some(secret) if secret.len() >= MIN_SECRET_LEN => secret.clone(),
            Some(_) => {
                return Err(ServerError::Config(format!(
                    "JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
                )));
            }
            None if !self.is_development() => {
                return Err(ServerError::Config(format!(
                    "JWT_SECRET must be set outside development (ENVIRONMENT={})",
                    self.environment
                )));
            }
            None => {
                tracing::warn!(
                    "JWT_SECRET not set, generating a temporary key (tokens will not survive a restart)"
                );
                generate_printable_secret()
            }
        };
        Ok(JwtConfig::new(secret, self.jwt_expiration_minutes))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
