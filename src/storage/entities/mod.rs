//! SeaORM 实体，对应 `migration` crate 建出的表

pub mod prelude;

pub mod attendance;
pub mod db_migrations;
pub mod ia_results;
pub mod question_papers;
pub mod students;
pub mod subjects;
pub mod test_allocation;
pub mod users;
