use serde::{Deserialize, Serialize};
use std::fmt;

/// 应用程序配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub revocation: RevocationConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_database_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_database_min_connections")]
    pub min_connections: u32,
    /// 分散给出的 PostgreSQL 连接参数，设置后优先于 url
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<DatabaseParts>,
}

/// PostgreSQL 连接参数（不经过 URL，密码可含任意字符）
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseParts {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for DatabaseParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseParts")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Redis 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
}

/// 认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// 会话令牌有效期（秒）
    #[serde(default = "default_access_token_expire")]
    pub access_token_expire: i64,
}

/// 令牌吊销表配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevocationConfig {
    #[serde(default = "default_enable_redis_revocation")]
    pub enable_redis: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

// ============ Default Functions ============

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "sqlite://examcell.db?mode=rwc".to_string()
}

fn default_database_max_connections() -> u32 {
    10
}

fn default_database_min_connections() -> u32 {
    2
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_jwt_secret() -> String {
    "CHANGE-THIS-SECRET-IN-PRODUCTION-MIN-32-CHARS".to_string()
}

fn default_access_token_expire() -> i64 {
    1440 * 60 // 24 hours
}

fn default_enable_redis_revocation() -> bool {
    false
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_enable_rotation() -> bool {
    true
}

fn default_max_backups() -> u32 {
    5
}

// ============ Default Trait Implementations ============

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_database_max_connections(),
            min_connections: default_database_min_connections(),
            parts: None,
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_token_expire: default_access_token_expire(),
        }
    }
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            enable_redis: default_enable_redis_revocation(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            enable_rotation: default_enable_rotation(),
            max_backups: default_max_backups(),
        }
    }
}
