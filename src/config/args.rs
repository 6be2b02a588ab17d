//! 命令行参数解析
//!
//! 支持的形式:
//! - `-c path` / `--config path` / `-c=path` / `--config=path`
//! - 子命令 `serve`（默认）或 `migrate`（只执行数据库迁移后退出）

/// 运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Migrate,
}

/// 解析后的命令行参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: Option<String>,
    pub command: Command,
}

/// 解析命令行参数（索引 0 为程序名）
pub fn parse(args: &[String]) -> Result<CliArgs, String> {
    let config_path = parse_config_path(args);
    let rest = filter_config_args(args);

    let command = match rest.get(1).map(String::as_str) {
        None | Some("serve") => Command::Serve,
        Some("migrate") => Command::Migrate,
        Some(other) => return Err(format!("未知的子命令: {}", other)),
    };

    Ok(CliArgs {
        config_path,
        command,
    })
}

/// 从命令行参数解析配置文件路径
pub fn parse_config_path(args: &[String]) -> Option<String> {
    let mut i = 1; // 跳过程序名
    while i < args.len() {
        let arg = &args[i];

        if (arg == "-c" || arg == "--config") && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }

        if let Some(path) = arg.strip_prefix("-c=") {
            return Some(path.to_string());
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }

        i += 1;
    }

    None
}

/// 移除 `-c`/`--config` 及其值，剩下的用于识别子命令
fn filter_config_args(args: &[String]) -> Vec<String> {
    let mut filtered = Vec::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if (arg == "-c" || arg == "--config") && i + 1 < args.len() {
            i += 2;
            continue;
        }

        if arg.starts_with("-c=") || arg.starts_with("--config=") {
            i += 1;
            continue;
        }

        filtered.push(arg.clone());
        i += 1;
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_config_path_short_flag() {
        let args = argv(&["examcell", "-c", "custom.toml"]);
        assert_eq!(parse_config_path(&args), Some("custom.toml".to_string()));
    }

    #[test]
    fn test_parse_config_path_long_equals() {
        let args = argv(&["examcell", "--config=custom.toml"]);
        assert_eq!(parse_config_path(&args), Some("custom.toml".to_string()));
    }

    #[test]
    fn test_default_command_is_serve() {
        let parsed = parse(&argv(&["examcell"])).unwrap();
        assert_eq!(parsed.command, Command::Serve);
        assert_eq!(parsed.config_path, None);
    }

    #[test]
    fn test_migrate_after_config_flag() {
        let parsed = parse(&argv(&["examcell", "-c", "prod.toml", "migrate"])).unwrap();
        assert_eq!(parsed.command, Command::Migrate);
        assert_eq!(parsed.config_path, Some("prod.toml".to_string()));
    }

    #[test]
    fn test_migrate_before_config_flag() {
        let parsed = parse(&argv(&["examcell", "migrate", "--config=prod.toml"])).unwrap();
        assert_eq!(parsed.command, Command::Migrate);
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(parse(&argv(&["examcell", "rollback"])).is_err());
    }
}
