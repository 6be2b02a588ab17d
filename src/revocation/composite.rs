use async_trait::async_trait;
use std::sync::Arc;

use super::traits::RevocationStore;
use crate::errors::AppError;

/// 组合吊销表（本地内存 + 可选 Redis）
///
/// 写入两边；查询先查本地，再查 Redis。Redis 出错时只记录警告。
pub struct CompositeRevocations {
    local: Arc<dyn RevocationStore>,
    shared: Option<Arc<dyn RevocationStore>>,
}

impl CompositeRevocations {
    pub fn new(local: Arc<dyn RevocationStore>, shared: Option<Arc<dyn RevocationStore>>) -> Self {
        Self { local, shared }
    }

    pub fn local_only(local: Arc<dyn RevocationStore>) -> Self {
        Self::new(local, None)
    }
}

#[async_trait]
impl RevocationStore for CompositeRevocations {
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> Result<(), AppError> {
        self.local.revoke(jti, ttl_secs).await?;

        if let Some(shared) = &self.shared
            && let Err(e) = shared.revoke(jti, ttl_secs).await
        {
            tracing::warn!("Shared revocation write failed for {}: {}", jti, e);
        }
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, AppError> {
        if self.local.is_revoked(jti).await? {
            tracing::debug!("Token revoked (local): {}", jti);
            return Ok(true);
        }

        let Some(shared) = &self.shared else {
            return Ok(false);
        };

        match shared.is_revoked(jti).await {
            Ok(revoked) => Ok(revoked),
            Err(e) => {
                tracing::warn!("Shared revocation lookup failed for {}: {}", jti, e);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revocation::MemoryRevocations;

    /// 总是失败的共享存储
    struct Unreachable;

    #[async_trait]
    impl RevocationStore for Unreachable {
        async fn revoke(&self, _jti: &str, _ttl_secs: u64) -> Result<(), AppError> {
            Err(AppError::Internal("connection refused".into()))
        }

        async fn is_revoked(&self, _jti: &str) -> Result<bool, AppError> {
            Err(AppError::Internal("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_revocation_visible_through_shared_store() {
        let shared: Arc<dyn RevocationStore> = Arc::new(MemoryRevocations::new());
        let a = CompositeRevocations::new(Arc::new(MemoryRevocations::new()), Some(shared.clone()));
        let b = CompositeRevocations::new(Arc::new(MemoryRevocations::new()), Some(shared));

        a.revoke("jti-1", 60).await.unwrap();
        // 另一个实例通过共享存储看到吊销
        assert!(b.is_revoked("jti-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_shared_failure_falls_back_to_local() {
        let store = CompositeRevocations::new(
            Arc::new(MemoryRevocations::new()),
            Some(Arc::new(Unreachable)),
        );

        store.revoke("jti-2", 60).await.unwrap();
        assert!(store.is_revoked("jti-2").await.unwrap());
        assert!(!store.is_revoked("jti-3").await.unwrap());
    }
}
