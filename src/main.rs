use examcell::AppError;
use examcell::config::args::{self, Command};
use examcell::config::init_config;
use examcell::runtime::{listen_for_shutdown, migrate_only, prepare_server, run_server};
use examcell::system::install_panic_hook;
use std::env;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    // 安装 panic hook
    install_panic_hook();

    // 解析命令行参数
    let cli_args: Vec<String> = env::args().collect();
    let cli = args::parse(&cli_args).map_err(AppError::Config)?;

    // 初始化全局配置
    let config = init_config(cli.config_path);

    if cli.command == Command::Migrate {
        migrate_only(config).await.inspect_err(|e| {
            eprintln!("{}", e.format_colored());
        })?;
        return Ok(());
    }

    // 初始化服务器
    let ctx = prepare_server(config).await.inspect_err(|e| {
        eprintln!("{}", e.format_colored());
    })?;

    tracing::info!("examcell is ready");

    // 启动 HTTP 服务器和优雅关闭监听
    tokio::select! {
        result = run_server(ctx) => {
            result.map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;
        }
        _ = listen_for_shutdown() => {
            tracing::info!("收到关闭信号，正在停止服务器...");
        }
    }

    Ok(())
}
