pub mod auth;

pub use auth::{JwtAuth, claims_of};
