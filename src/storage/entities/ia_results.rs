use sea_orm::entity::prelude::*;

/// IA（平时考核）成绩，(student_id, qp_id) 唯一
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ia_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id: Option<i32>,
    pub qp_id: Option<i32>,
    pub marks: Option<i32>,
    // 旧库里该列可为空
    pub max_marks: Option<i32>,
    pub content: Option<String>,
    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
