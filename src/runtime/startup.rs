use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::{AppConfig, RedisConfig, RevocationConfig};
use crate::errors::AppError;
use crate::revocation::{CompositeRevocations, MemoryRevocations, RedisRevocations, RevocationStore};
use crate::security::JwtManager;
use crate::storage::{MigrationReport, SeaOrmBackend, connect, run_schema_migrations};

/// 服务器启动上下文
pub struct StartupContext {
    pub db: Arc<DatabaseConnection>,
    pub storage: Arc<SeaOrmBackend>,
    pub revocations: Arc<CompositeRevocations>,
    pub jwt_manager: Arc<JwtManager>,
    _log_guard: WorkerGuard,
}

/// 初始化 TLS 和日志
fn init_process(config: &AppConfig) -> Result<WorkerGuard, AppError> {
    // 1. 初始化 Rust-TLS
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| AppError::Internal("Failed to install crypto provider".into()))?;

    // 2. 初始化日志
    let log_guard = crate::system::init_logging(&config.log)?;
    tracing::info!("examcell v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = crate::config::get_config_path() {
        tracing::info!("Using config file: {}", path);
    }

    Ok(log_guard)
}

/// 初始化服务器
///
/// 数据库不可用或迁移失败时直接返回错误，不重试。
pub async fn prepare_server(config: &AppConfig) -> Result<StartupContext, AppError> {
    let log_guard = init_process(config)?;

    // 3. 验证配置
    config.validate()?;

    // 4. 初始化数据库
    let db = connect(&config.database).await?;
    tracing::info!("Database connected");

    // 5. 运行数据库迁移
    tracing::info!("Running database migrations...");
    let report = run_schema_migrations(&db).await?;
    log_report(&report);

    // 6. 初始化吊销表
    let revocations = init_revocations(&config.revocation, &config.redis).await;
    tracing::info!("Token revocation initialized");

    // 7. 初始化 JWT 管理器
    let jwt_manager = Arc::new(JwtManager::new(
        config.auth.jwt_secret.clone(),
        config.auth.access_token_expire,
    ));
    tracing::info!("JWT manager initialized");

    tracing::info!("Server initialization complete");

    let db = Arc::new(db);
    Ok(StartupContext {
        storage: Arc::new(SeaOrmBackend::new(db.clone())),
        db,
        revocations: Arc::new(revocations),
        jwt_manager,
        _log_guard: log_guard,
    })
}

/// 只执行迁移（`migrate` 子命令）
pub async fn migrate_only(config: &AppConfig) -> Result<MigrationReport, AppError> {
    let _log_guard = init_process(config)?;

    let db = connect(&config.database).await?;
    let report = run_schema_migrations(&db).await?;
    log_report(&report);

    Ok(report)
}

fn log_report(report: &MigrationReport) {
    if report.is_noop() {
        tracing::info!("Schema up to date ({} migrations recorded)", report.skipped.len());
    } else {
        tracing::info!(
            "Schema migrated: {} applied, {} already present",
            report.applied.len(),
            report.tolerated.len()
        );
    }
}

/// 初始化吊销表，Redis 不可用时只用内存
async fn init_revocations(
    revocation_config: &RevocationConfig,
    redis_config: &RedisConfig,
) -> CompositeRevocations {
    let local = Arc::new(MemoryRevocations::new());

    if !revocation_config.enable_redis {
        return CompositeRevocations::local_only(local);
    }

    match RedisRevocations::new(redis_config).await {
        Ok(shared) => {
            tracing::info!("Redis revocation store connected");
            CompositeRevocations::new(local, Some(Arc::new(shared) as Arc<dyn RevocationStore>))
        }
        Err(e) => {
            tracing::warn!("Redis connection failed: {}", e);
            tracing::warn!("Falling back to memory-only revocation");
            CompositeRevocations::local_only(local)
        }
    }
}
