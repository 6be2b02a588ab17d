//! 登录账号到学生档案的解析

mod resolver;
mod session;

pub use resolver::{MatchStrategy, ProfileResolution, normalize_email, resolve_profile};
pub use session::session_profile;
