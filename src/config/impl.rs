use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use super::{AppConfig, DatabaseParts};
use crate::errors::AppError;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();
static CONFIG_PATH: OnceLock<String> = OnceLock::new();

impl AppConfig {
    /// 从文件加载配置,支持环境变量覆盖
    ///
    /// # 参数
    /// * `config_path` - 可选的配置文件路径
    ///   - `Some(path)`: 使用指定文件（不存在则创建）
    ///   - `None`: 使用默认 "config.toml"（不存在则警告）
    pub fn load(config_path: Option<&str>) -> Self {
        let mut config = Self::load_from_file(config_path);
        config.override_with_env();
        config
    }

    /// 从 TOML 文件加载配置
    ///
    /// # 行为
    /// - 如果提供 `config_path` 且文件不存在: 创建默认配置文件
    /// - 如果未提供路径且文件不存在: 警告并使用内存默认值
    fn load_from_file(config_path: Option<&str>) -> Self {
        let path = config_path.unwrap_or("config.toml");
        let is_custom_path = config_path.is_some();

        if !Path::new(path).exists() {
            if is_custom_path {
                eprintln!("[WARN] 配置文件不存在: {}", path);
                eprintln!("[WARN] 正在创建默认配置文件...");
                if let Err(e) = Self::ensure_config_file(path) {
                    eprintln!("[ERROR] 创建配置文件失败 {}: {}", path, e);
                    eprintln!("[WARN] 使用内存默认配置");
                    return Self::default();
                }
                eprintln!("[INFO] 配置文件已创建: {}", path);
            } else {
                eprintln!("[WARN] 未找到配置文件: {}", path);
                eprintln!("[WARN] 使用内存默认配置");
                eprintln!("[HINT] 使用 -c/--config 指定自定义配置文件");
                return Self::default();
            }
        }

        match fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => {
                    eprintln!("[INFO] 配置已从文件加载: {}", path);
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] 解析配置文件失败 {}: {}", path, e);
                    eprintln!("[WARN] 使用内存默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] 读取配置文件失败 {}: {}", path, e);
                eprintln!("[WARN] 使用内存默认配置");
                Self::default()
            }
        }
    }

    /// 解析 TOML 文本
    pub fn from_toml(content: &str) -> Result<Self, AppError> {
        toml::from_str::<AppConfig>(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))
    }

    /// 确保配置文件存在,不存在则创建默认值
    fn ensure_config_file(path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(&Self::default())?;

        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        Ok(())
    }

    /// 用环境变量覆盖配置
    fn override_with_env(&mut self) {
        self.apply_env(|key| env::var(key).ok());
    }

    /// 按给定的查找函数覆盖配置（便于测试）
    ///
    /// 值为空白的变量视为未设置。
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // 服务器配置
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            } else {
                eprintln!("[ERROR] 无效的 SERVER_PORT: {}", port);
            }
        }

        // 数据库配置：DATABASE_URL 优先，其次是分散的 DB_* 变量
        if let Some(database_url) = lookup("DATABASE_URL") {
            self.database.url = database_url;
            self.database.parts = None;
        } else if let Some(parts) = database_parts_from_env(&lookup) {
            self.database.parts = Some(parts);
        }
        if let Some(max_conn) = lookup("DATABASE_MAX_CONNECTIONS") {
            if let Ok(n) = max_conn.parse() {
                self.database.max_connections = n;
            } else {
                eprintln!("[ERROR] 无效的 DATABASE_MAX_CONNECTIONS: {}", max_conn);
            }
        }
        if let Some(min_conn) = lookup("DATABASE_MIN_CONNECTIONS") {
            if let Ok(n) = min_conn.parse() {
                self.database.min_connections = n;
            } else {
                eprintln!("[ERROR] 无效的 DATABASE_MIN_CONNECTIONS: {}", min_conn);
            }
        }

        // Redis 配置
        if let Some(redis_url) = lookup("REDIS_URL") {
            self.redis.url = redis_url;
        }

        // 认证配置
        if let Some(jwt_secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = jwt_secret;
        }
        if let Some(expire) = lookup("ACCESS_TOKEN_EXPIRE") {
            if let Ok(n) = expire.parse() {
                self.auth.access_token_expire = n;
            } else {
                eprintln!("[ERROR] 无效的 ACCESS_TOKEN_EXPIRE: {}", expire);
            }
        }

        // 吊销表配置
        if let Some(enable) = lookup("ENABLE_REDIS_REVOCATION") {
            self.revocation.enable_redis = enable == "true" || enable == "1";
        }

        // 日志配置
        if let Some(level) = lookup("RUST_LOG") {
            self.log.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.log.format = format;
        }
        if let Some(file) = lookup("LOG_FILE") {
            self.log.file = Some(file);
        }
        if let Some(enable) = lookup("LOG_ENABLE_ROTATION") {
            self.log.enable_rotation = enable == "true" || enable == "1";
        }
        if let Some(backups) = lookup("LOG_MAX_BACKUPS") {
            if let Ok(n) = backups.parse() {
                self.log.max_backups = n;
            } else {
                eprintln!("[ERROR] 无效的 LOG_MAX_BACKUPS: {}", backups);
            }
        }
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.len() < 32 {
            return Err(AppError::Config(
                "JWT secret must be at least 32 characters".into(),
            ));
        }

        if self.auth.access_token_expire <= 0 {
            return Err(AppError::Config(
                "Access token expire time must be positive".into(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::Config(
                "database.min_connections exceeds database.max_connections".into(),
            ));
        }

        Ok(())
    }
}

/// 由 DB_HOST / DB_PORT / DB_NAME / DB_USER / DB_PASSWORD 组成 PostgreSQL 连接参数
///
/// 一个都没设置时返回 `None`，缺省项使用本地开发默认值，空白值视为未设置。
pub fn database_parts_from_env<F>(lookup: &F) -> Option<DatabaseParts>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let host = get("DB_HOST");
    let port = get("DB_PORT");
    let name = get("DB_NAME");
    let user = get("DB_USER");
    let password = get("DB_PASSWORD");

    if host.is_none() && port.is_none() && name.is_none() && user.is_none() && password.is_none()
    {
        return None;
    }

    let port = match port {
        Some(port) => port.trim().parse().unwrap_or_else(|_| {
            eprintln!("[ERROR] 无效的 DB_PORT: {}", port);
            5432
        }),
        None => 5432,
    };

    Some(DatabaseParts {
        host: host.unwrap_or_else(|| "localhost".to_string()),
        port,
        name: name.unwrap_or_else(|| "admission_db".to_string()),
        user: user.unwrap_or_else(|| "user".to_string()),
        password: password.unwrap_or_else(|| "password".to_string()),
    })
}

// ============ 全局配置实例 ============

/// 获取全局配置实例
pub fn get_config() -> &'static AppConfig {
    CONFIG.get().expect("配置未初始化,请先调用 init_config()")
}

/// 初始化全局配置
///
/// # 参数
/// * `config_path` - 可选的配置文件路径
///   - `Some(path)`: 从指定文件加载（不存在则创建）
///   - `None`: 从默认 "config.toml" 加载（不存在则警告）
pub fn init_config(config_path: Option<String>) -> &'static AppConfig {
    if let Some(path) = &config_path {
        CONFIG_PATH.set(path.clone()).ok();
    }

    CONFIG.get_or_init(|| AppConfig::load(config_path.as_deref()))
}

/// 获取使用的配置文件路径
pub fn get_config_path() -> Option<&'static str> {
    CONFIG_PATH.get().map(|s| s.as_str())
}
