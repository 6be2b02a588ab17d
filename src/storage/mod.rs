pub mod backend;
mod backends;
pub mod connection;
pub mod duplicate;
pub mod entities;
pub mod migrator;
pub mod repository;

#[cfg(test)]
mod backend_tests;

pub use backend::SeaOrmBackend;
pub use connection::connect;
pub use duplicate::is_benign_duplicate;
pub use migrator::{MigrationReport, ensure_ledger, run_migrations, run_schema_migrations};
pub use repository::{AcademicRepository, AccountRepository, ProfileRepository};
