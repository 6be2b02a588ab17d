pub mod jwt;
pub mod password;
pub mod role;

pub use jwt::{Claims, IssuedToken, JwtManager, SessionKind};
pub use password::PasswordManager;
pub use role::Role;
