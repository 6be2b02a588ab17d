use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache as MokaCache;
use std::time::{Duration, Instant};

use super::traits::RevocationStore;
use crate::errors::AppError;

/// 每条记录按自身剩余有效期过期
struct PerEntryTtl;

impl Expiry<String, u64> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, ttl_secs: &u64, _created_at: Instant) -> Option<Duration> {
        Some(Duration::from_secs(*ttl_secs))
    }
}

/// 内存吊销表（基于 Moka）
///
/// 不设容量上限：条目只在令牌自然过期时移除，不能被淘汰。
pub struct MemoryRevocations {
    cache: MokaCache<String, u64>,
}

impl MemoryRevocations {
    pub fn new() -> Self {
        let cache = MokaCache::builder().expire_after(PerEntryTtl).build();

        Self { cache }
    }
}

impl Default for MemoryRevocations {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocations {
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> Result<(), AppError> {
        self.cache.insert(jti.to_string(), ttl_secs).await;
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, AppError> {
        Ok(self.cache.get(jti).await.is_some())
    }
}
