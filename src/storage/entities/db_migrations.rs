use sea_orm::entity::prelude::*;

/// 已执行的迁移记录，只追加
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "db_migrations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub migration_id: String,
    pub run_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
