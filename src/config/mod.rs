pub mod args;
mod r#impl;
mod structs;

pub use r#impl::{database_parts_from_env, get_config, get_config_path, init_config};
pub use structs::*;
