//! 会话令牌吊销表（登出后令牌在过期前不可再用）

pub mod composite;
pub mod memory;
pub mod redis_store;
pub mod traits;

pub use composite::CompositeRevocations;
pub use memory::MemoryRevocations;
pub use redis_store::RedisRevocations;
pub use traits::RevocationStore;
