use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// SeaORM 存储后端
///
/// 各仓储 trait 的实现按领域拆在 `backends/` 下。
#[derive(Clone)]
pub struct SeaOrmBackend {
    pub(super) db: Arc<DatabaseConnection>,
}

impl SeaOrmBackend {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }
}
