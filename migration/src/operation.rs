use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;
use sea_orm_migration::sea_query::{
    MysqlQueryBuilder, PostgresQueryBuilder, QueryBuilder, SchemaBuilder,
    SqliteQueryBuilder,
};

/// 一个带稳定 id 的迁移步骤
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: String,
    pub operation: Operation,
}

impl Migration {
    pub fn new(id: impl Into<String>, operation: impl Into<Operation>) -> Self {
        Self {
            id: id.into(),
            operation: operation.into(),
        }
    }
}

/// 迁移操作
///
/// 语句在执行时按目标数据库渲染，`Raw` 原样执行。
#[derive(Debug, Clone)]
pub enum Operation {
    CreateTable(TableCreateStatement),
    AlterTable(TableAlterStatement),
    CreateIndex(IndexCreateStatement),
    Insert(InsertStatement),
    Raw(String),
}

impl Operation {
    /// 渲染为目标数据库的 SQL
    pub fn to_sql(&self, backend: DatabaseBackend) -> String {
        match backend {
            DatabaseBackend::Postgres => self.render(PostgresQueryBuilder),
            DatabaseBackend::MySql => self.render(MysqlQueryBuilder),
            DatabaseBackend::Sqlite => self.render(SqliteQueryBuilder),
            _ => self.render(SqliteQueryBuilder),
        }
    }

    fn render<B>(&self, builder: B) -> String
    where
        B: SchemaBuilder + QueryBuilder,
    {
        match self {
            Operation::CreateTable(stmt) => stmt.to_string(builder),
            Operation::AlterTable(stmt) => stmt.to_string(builder),
            Operation::CreateIndex(stmt) => stmt.to_string(builder),
            Operation::Insert(stmt) => stmt.to_string(builder),
            Operation::Raw(sql) => sql.clone(),
        }
    }
}

impl From<TableCreateStatement> for Operation {
    fn from(stmt: TableCreateStatement) -> Self {
        Operation::CreateTable(stmt)
    }
}

impl From<TableAlterStatement> for Operation {
    fn from(stmt: TableAlterStatement) -> Self {
        Operation::AlterTable(stmt)
    }
}

impl From<IndexCreateStatement> for Operation {
    fn from(stmt: IndexCreateStatement) -> Self {
        Operation::CreateIndex(stmt)
    }
}

impl From<InsertStatement> for Operation {
    fn from(stmt: InsertStatement) -> Self {
        Operation::Insert(stmt)
    }
}

impl From<&str> for Operation {
    fn from(sql: &str) -> Self {
        Operation::Raw(sql.to_string())
    }
}

impl From<String> for Operation {
    fn from(sql: String) -> Self {
        Operation::Raw(sql)
    }
}
