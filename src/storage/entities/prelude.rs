pub use super::attendance::Entity as Attendance;
pub use super::db_migrations::Entity as DbMigrations;
pub use super::ia_results::Entity as IaResults;
pub use super::question_papers::Entity as QuestionPapers;
pub use super::students::Entity as Students;
pub use super::subjects::Entity as Subjects;
pub use super::test_allocation::Entity as TestAllocation;
pub use super::users::Entity as Users;
