//! Panic handler module
//!
//! 服务进程 panic 时：输出彩色堆栈、写入 tracing，并追加到 crash.log。

use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic;
use std::path::PathBuf;

/// 崩溃日志文件
const CRASH_LOG: &str = "crash.log";

/// 安装自定义 panic hook
pub fn install_panic_hook() {
    let crash_log = PathBuf::from(CRASH_LOG);

    panic::set_hook(Box::new(move |panic_info| {
        let payload = panic_info.payload();
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "Unknown location".to_string());

        let thread = std::thread::current()
            .name()
            .unwrap_or("unnamed")
            .to_string();
        let backtrace = std::backtrace::Backtrace::force_capture();
        let report = CrashReport {
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            message,
            location,
            thread,
            backtrace: format!("{:?}", backtrace),
        };

        tracing::error!(
            thread = %report.thread,
            location = %report.location,
            "panic: {}",
            report.message
        );

        if let Err(e) = report.append_to(&crash_log) {
            eprintln!("Failed to write crash log: {}", e);
        }

        report.print();
    }));
}

struct CrashReport {
    timestamp: String,
    message: String,
    location: String,
    thread: String,
    backtrace: String,
}

impl CrashReport {
    /// 彩色输出到 stderr
    fn print(&self) {
        use colored::Colorize;

        let rule = "═══════════════════════════════════════════════════"
            .red()
            .bold();

        eprintln!();
        eprintln!("{}", rule);
        eprintln!(
            "{} {}",
            "PANIC".red().bold(),
            format!("examcell v{}", env!("CARGO_PKG_VERSION")).dimmed()
        );
        eprintln!("{}", rule);
        eprintln!();
        eprintln!("{} {}", "原因:".yellow().bold(), self.message.white());
        eprintln!("{} {}", "位置:".yellow().bold(), self.location.white());
        eprintln!("{} {}", "线程:".yellow().bold(), self.thread.white());
        eprintln!();
        eprintln!("{}", "堆栈跟踪:".yellow().bold());
        eprintln!("{}", self.backtrace.dimmed());
        eprintln!();
        eprintln!("{}", format!("详细信息已保存到 {}", CRASH_LOG).cyan());
        eprintln!("{}", rule);
        eprintln!();
    }

    /// 追加到崩溃日志
    fn append_to(&self, path: &PathBuf) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        writeln!(file, "==========================================")?;
        writeln!(file, "Crash Report - {}", self.timestamp)?;
        writeln!(file, "==========================================")?;
        writeln!(file, "Version: {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(file, "Thread: {}", self.thread)?;
        writeln!(file, "Message: {}", self.message)?;
        writeln!(file, "Location: {}", self.location)?;
        writeln!(file, "\nBacktrace:")?;
        writeln!(file, "{}", self.backtrace)?;
        writeln!(file, "==========================================\n")?;

        Ok(())
    }
}
