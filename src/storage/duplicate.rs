//! "对象已存在" 类错误的识别
//!
//! 迁移重复执行、或并发实例先一步建好对象时，数据库会返回这类错误。
//! 执行器把它们视为该步骤已完成。

use sea_orm::{DbBackend, DbErr, RuntimeErr};

/// PostgreSQL SQLSTATE: duplicate_table / duplicate_column / duplicate_object / unique_violation
const POSTGRES_CODES: &[&str] = &["42P07", "42701", "42710", "23505"];

/// MySQL SQLSTATE: 表已存在 / 列已存在
const MYSQL_CODES: &[&str] = &["42S01", "42S21"];

/// MySQL 对重复索引、重复键只给出通用 SQLSTATE，需要看消息
const MYSQL_MESSAGES: &[&str] = &[
    "duplicate key name",
    "duplicate entry",
    "duplicate foreign key constraint name",
];

/// SQLite 扩展错误码: SQLITE_CONSTRAINT_UNIQUE / SQLITE_CONSTRAINT_PRIMARYKEY
const SQLITE_CODES: &[&str] = &["2067", "1555"];

/// SQLite 的建表、加列冲突都是 SQLITE_ERROR (1)，只能看消息
const SQLITE_MESSAGES: &[&str] = &["already exists", "duplicate column name"];

/// 判断数据库错误是否表示"对象已存在"
pub fn is_benign_duplicate(backend: DbBackend, err: &DbErr) -> bool {
    let sqlx_err: &sqlx::Error = match err {
        DbErr::Exec(RuntimeErr::SqlxError(e))
        | DbErr::Query(RuntimeErr::SqlxError(e))
        | DbErr::Conn(RuntimeErr::SqlxError(e)) => e,
        _ => return false,
    };

    match sqlx_err.as_database_error() {
        Some(db_err) => classify(backend, db_err.code().as_deref(), db_err.message()),
        None => false,
    }
}

/// 按错误码和消息分类
pub fn classify(backend: DbBackend, code: Option<&str>, message: &str) -> bool {
    let message = message.to_lowercase();
    let code_in = |codes: &[&str]| code.is_some_and(|c| codes.contains(&c));
    let message_has = |fragments: &[&str]| fragments.iter().any(|f| message.contains(f));

    match backend {
        DbBackend::Postgres => code_in(POSTGRES_CODES),
        DbBackend::MySql => code_in(MYSQL_CODES) || message_has(MYSQL_MESSAGES),
        DbBackend::Sqlite => code_in(SQLITE_CODES) || message_has(SQLITE_MESSAGES),
        _ => false,
    }
}
