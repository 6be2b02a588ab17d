use tokio::signal;
use tracing::warn;

/// 等待关闭信号（Ctrl+C）
pub async fn listen_for_shutdown() {
    if let Err(e) = signal::ctrl_c().await {
        // 无法监听信号时不主动退出，交给进程管理器处理
        warn!("无法监听 Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }

    warn!("收到关闭信号，正在执行清理操作...");
}
