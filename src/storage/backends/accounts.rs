use async_trait::async_trait;
use sea_orm::*;

use crate::errors::AppError;
use crate::storage::entities::{prelude::*, *};
use crate::storage::repository::*;

use super::super::backend::SeaOrmBackend;

#[async_trait]
impl AccountRepository for SeaOrmBackend {
    async fn find_account(&self, id: i32) -> Result<Option<users::Model>, AppError> {
        let user = Users::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(user)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<users::Model>, AppError> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email.trim()))
            .one(self.db.as_ref())
            .await?;
        Ok(user)
    }
}
