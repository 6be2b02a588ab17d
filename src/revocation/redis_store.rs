use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};

use super::traits::RevocationStore;
use crate::config::RedisConfig;
use crate::errors::AppError;

const KEY_PREFIX: &str = "examcell:revoked:";

/// Redis 吊销表，多实例共享
pub struct RedisRevocations {
    conn: MultiplexedConnection,
}

impl RedisRevocations {
    pub async fn new(config: &RedisConfig) -> Result<Self, AppError> {
        let client = Client::open(config.url.as_str())?;
        let conn = client.get_multiplexed_async_connection().await?;

        Ok(Self { conn })
    }

    fn key(jti: &str) -> String {
        format!("{}{}", KEY_PREFIX, jti)
    }
}

#[async_trait]
impl RevocationStore for RedisRevocations {
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> Result<(), AppError> {
        if ttl_secs == 0 {
            return Ok(());
        }
        // MultiplexedConnection 克隆开销很小，可并发使用
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(Self::key(jti), 1u8, ttl_secs).await?;
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, AppError> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(Self::key(jti)).await?;
        Ok(exists)
    }
}
