use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;
use crate::errors::AppError;

/// 初始化日志
///
/// 配置了 `file` 时写入滚动日志文件，否则写到 stdout。
/// 返回的 guard 必须存活到进程退出，否则缓冲中的日志会丢失。
pub fn init_logging(config: &LogConfig) -> Result<WorkerGuard, AppError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (writer, guard) = match &config.file {
        Some(file) => tracing_appender::non_blocking(file_appender(config, file)?),
        None => tracing_appender::non_blocking(std::io::stdout()),
    };
    let with_ansi = config.file.is_none();

    let result = match config.format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_ansi(with_ansi).with_writer(writer))
            .try_init(),
    };
    result.map_err(|e| AppError::Internal(format!("Failed to init logging: {}", e)))?;

    tracing::info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

fn file_appender(config: &LogConfig, file: &str) -> Result<RollingFileAppender, AppError> {
    let path = Path::new(file);
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let prefix = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("examcell.log");

    let rotation = if config.enable_rotation {
        Rotation::DAILY
    } else {
        Rotation::NEVER
    };

    RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(prefix)
        .max_log_files(config.max_backups.max(1) as usize)
        .build(directory)
        .map_err(|e| AppError::Config(format!("Cannot open log file {}: {}", file, e)))
}
