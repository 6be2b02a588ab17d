use async_trait::async_trait;

use crate::errors::AppError;

/// 吊销表
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// 吊销令牌，`ttl_secs` 后自动清除（此时令牌本身也已过期）
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> Result<(), AppError>;

    /// 令牌是否已吊销
    async fn is_revoked(&self, jti: &str) -> Result<bool, AppError>;
}
