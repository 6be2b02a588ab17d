pub use sea_orm_migration::prelude::*;

mod m20251201_000001_create_core_tables;
mod m20251201_000002_extend_columns;
mod m20251201_000003_add_unique_keys;
mod m20251201_000004_seed_semesters;
mod operation;

pub use operation::{Migration, Operation};

/// 迁移记录表名
pub const LEDGER_TABLE: &str = "db_migrations";

/// 学院教务库的全部迁移，按执行顺序排列
///
/// 后面的步骤依赖前面的步骤（先建表，再加列，最后加唯一键和种子数据），
/// 调用方不得重排。
pub fn migrations() -> Vec<Migration> {
    let mut all = Vec::new();
    all.extend(m20251201_000001_create_core_tables::migrations());
    all.extend(m20251201_000002_extend_columns::migrations());
    all.extend(m20251201_000003_add_unique_keys::migrations());
    all.extend(m20251201_000004_seed_semesters::migrations());
    all
}

/// 迁移记录表的建表语句（可重复执行）
pub fn ledger_table() -> TableCreateStatement {
    Table::create()
        .table(DbMigrations::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(DbMigrations::MigrationId)
                .string_len(255)
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(DbMigrations::RunAt).timestamp().not_null())
        .to_owned()
}

#[derive(DeriveIden)]
enum DbMigrations {
    Table,
    MigrationId,
    RunAt,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::DatabaseBackend;
    use std::collections::HashSet;

    #[test]
    fn test_migration_ids_are_unique() {
        let all = migrations();
        let ids: HashSet<&str> = all.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), all.len());
    }

    #[test]
    fn test_tables_created_before_columns_added() {
        let all = migrations();
        let position = |id: &str| all.iter().position(|m| m.id == id).unwrap();

        assert!(position("create_table_students") < position("add_students_user_id"));
        assert!(position("create_table_ia_results") < position("add_ia_results_max_marks"));
        assert!(position("add_students_email") < position("add_constraint_students_email"));
        assert!(position("create_table_semesters") < position("seed_semesters"));
    }

    #[test]
    fn test_ledger_table_renders_if_not_exists() {
        let sql = Operation::from(ledger_table()).to_sql(DatabaseBackend::Sqlite);
        assert!(sql.contains("IF NOT EXISTS"));
        assert!(sql.contains("\"db_migrations\""));
        assert!(sql.contains(LEDGER_TABLE));
    }

    #[test]
    fn test_render_per_backend() {
        let create = migrations()
            .into_iter()
            .find(|m| m.id == "create_table_semesters")
            .unwrap();

        let postgres = create.operation.to_sql(DatabaseBackend::Postgres);
        let mysql = create.operation.to_sql(DatabaseBackend::MySql);

        assert!(postgres.contains("\"semesters\""));
        assert!(mysql.contains("`semesters`"));
    }

    #[test]
    fn test_raw_operation_is_verbatim() {
        let op = Operation::from("CREATE TABLE widgets (id INTEGER)");
        assert_eq!(
            op.to_sql(DatabaseBackend::Postgres),
            "CREATE TABLE widgets (id INTEGER)"
        );
    }
}
