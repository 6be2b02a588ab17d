use sea_orm::entity::prelude::*;

/// 学生档案（学业记录），与登录账号分离
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id_text: Option<String>,
    pub usn: Option<String>,
    pub student_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub semester: Option<i32>,
    pub section: Option<String>,
    pub class_id: Option<i32>,
    /// 关联的登录账号 `users.id`
    pub user_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
