use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::errors::AppError;
use crate::storage::entities::{prelude::*, *};
use crate::storage::repository::*;

use super::super::backend::SeaOrmBackend;

#[async_trait]
impl ProfileRepository for SeaOrmBackend {
    async fn find_profile_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<students::Model>, AppError> {
        let profile = Students::find()
            .filter(students::Column::UserId.eq(user_id))
            .order_by_asc(students::Column::Id)
            .one(self.db.as_ref())
            .await?;
        Ok(profile)
    }

    async fn find_profile(&self, id: i32) -> Result<Option<students::Model>, AppError> {
        let profile = Students::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(profile)
    }

    async fn find_profiles_by_email(
        &self,
        normalized_email: &str,
    ) -> Result<Vec<students::Model>, AppError> {
        let profiles = Students::find()
            .filter(Expr::cust_with_values(
                "LOWER(TRIM(email)) = ?",
                [normalized_email],
            ))
            .order_by_asc(students::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(profiles)
    }

    async fn list_profiles(&self) -> Result<Vec<students::Model>, AppError> {
        let profiles = Students::find()
            .order_by_asc(students::Column::StudentName)
            .order_by_asc(students::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(profiles)
    }
}
