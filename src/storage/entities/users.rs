use sea_orm::entity::prelude::*;

/// 登录账号（admin / staff / HOD / principal / student）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: Option<String>,
    pub surname: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub role: String,
}

impl Model {
    /// 显示名称
    pub fn display_name(&self) -> String {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.surname.as_deref().unwrap_or_default()
        );
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
