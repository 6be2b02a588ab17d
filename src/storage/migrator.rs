//! 迁移执行器
//!
//! 按顺序执行 `(id, operation)`：
//! 已记录的 id 跳过；未记录的在独立事务中执行并写入记录；
//! "对象已存在" 视为已完成并补写记录；其他错误终止并带上迁移 id。

use chrono::Utc;
use migration::{LEDGER_TABLE, Migration, Operation};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait, Set,
    TransactionTrait,
};

use super::duplicate::is_benign_duplicate;
use super::entities::{db_migrations, prelude::DbMigrations};
use crate::errors::AppError;

/// 一次执行的结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// 本次真正执行的
    pub applied: Vec<String>,
    /// 对象已存在，直接补写记录的
    pub tolerated: Vec<String>,
    /// 之前已记录，未执行的
    pub skipped: Vec<String>,
}

impl MigrationReport {
    /// 本次是否执行过任何语句
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty() && self.tolerated.is_empty()
    }
}

/// 执行内置的全部学院教务迁移
pub async fn run_schema_migrations(db: &DatabaseConnection) -> Result<MigrationReport, AppError> {
    run_migrations(db, &migration::migrations()).await
}

/// 按顺序执行给定迁移
#[tracing_attributes::instrument(skip_all, fields(total = migrations.len()))]
pub async fn run_migrations(
    db: &DatabaseConnection,
    migrations: &[Migration],
) -> Result<MigrationReport, AppError> {
    ensure_ledger(db).await?;

    let backend = db.get_database_backend();
    let mut report = MigrationReport::default();

    for migration in migrations {
        let id = migration.id.as_str();

        // 在事务外检查
        if is_recorded(db, id).await? {
            report.skipped.push(id.to_string());
            continue;
        }

        match apply(db, backend, migration).await {
            Ok(()) => {
                tracing::info!("Migration applied: {}", id);
                report.applied.push(id.to_string());
            }
            Err(e) if is_benign_duplicate(backend, &e) => {
                tracing::debug!("Migration {} already satisfied: {}", id, e);
                record_tolerant(db, backend, id)
                    .await
                    .map_err(|source| fatal(id, source))?;
                report.tolerated.push(id.to_string());
            }
            Err(e) => {
                tracing::error!("Migration {} failed: {}", id, e);
                return Err(fatal(id, e));
            }
        }
    }

    tracing::info!(
        applied = report.applied.len(),
        tolerated = report.tolerated.len(),
        skipped = report.skipped.len(),
        "Database migrations completed"
    );

    Ok(report)
}

/// 创建迁移记录表（已存在时什么都不做）
pub async fn ensure_ledger(db: &DatabaseConnection) -> Result<(), AppError> {
    let backend = db.get_database_backend();
    let sql = Operation::from(migration::ledger_table()).to_sql(backend);

    match db.execute_unprepared(&sql).await {
        Ok(_) => Ok(()),
        // 并发启动时另一个实例可能抢先建好
        Err(e) if is_benign_duplicate(backend, &e) => Ok(()),
        Err(e) => Err(fatal(LEDGER_TABLE, e)),
    }
}

/// 已执行过的迁移 id
pub async fn applied_ids(db: &DatabaseConnection) -> Result<Vec<String>, AppError> {
    let rows = DbMigrations::find().all(db).await?;
    Ok(rows.into_iter().map(|r| r.migration_id).collect())
}

async fn is_recorded(db: &DatabaseConnection, id: &str) -> Result<bool, AppError> {
    let row = DbMigrations::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(|source| fatal(id, source))?;
    Ok(row.is_some())
}

/// 执行语句并写入记录，二者在同一事务中
async fn apply(
    db: &DatabaseConnection,
    backend: DbBackend,
    migration: &Migration,
) -> Result<(), DbErr> {
    let sql = migration.operation.to_sql(backend);
    let txn = db.begin().await?;

    let outcome: Result<(), DbErr> = async {
        txn.execute_unprepared(&sql).await?;
        record(&txn, &migration.id).await
    }
    .await;

    match outcome {
        Ok(()) => txn.commit().await,
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!("Rollback of {} failed: {}", migration.id, rollback_err);
            }
            Err(e)
        }
    }
}

async fn record<C: ConnectionTrait>(conn: &C, id: &str) -> Result<(), DbErr> {
    db_migrations::ActiveModel {
        migration_id: Set(id.to_string()),
        run_at: Set(Utc::now().naive_utc()),
    }
    .insert(conn)
    .await?;
    Ok(())
}

/// 失败事务回滚之后补写记录；记录已被其他实例写入也算成功
pub(super) async fn record_tolerant(db: &DatabaseConnection, backend: DbBackend, id: &str) -> Result<(), DbErr> {
    match record(db, id).await {
        Err(e) if is_benign_duplicate(backend, &e) => Ok(()),
        other => other,
    }
}

fn fatal(id: &str, source: DbErr) -> AppError {
    AppError::Migration {
        id: id.to_string(),
        source,
    }
}
