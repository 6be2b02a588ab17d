use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;
use crate::errors::AppError;

/// 令牌主体的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// 账号登录，sub 是 `users.id`
    Account,
    /// 学生档案登录，sub 是 `students.id`
    Profile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,       // users.id 或 students.id，由 kind 区分
    pub kind: SessionKind, // 主体来源
    pub role: String,      // 登录时的角色
    pub jti: String,  // 令牌 id，用于吊销
    pub iat: i64,     // 签发时间戳
    pub exp: i64,     // 过期时间戳
}

impl Claims {
    pub fn subject_id(&self) -> Result<i32, AppError> {
        self.sub.parse::<i32>().map_err(|_| AppError::InvalidToken)
    }

    pub fn role(&self) -> Result<Role, AppError> {
        self.role.parse().map_err(|_| AppError::InvalidToken)
    }

    /// 距离过期的秒数
    pub fn remaining_secs(&self) -> u64 {
        (self.exp - chrono::Utc::now().timestamp()).max(0) as u64
    }
}

/// 签发结果
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

pub struct JwtManager {
    secret: String,
    expire_in: i64,
}

impl JwtManager {
    pub fn new(secret: String, expire_in: i64) -> Self {
        Self { secret, expire_in }
    }

    /// 为登录账号签发令牌
    pub fn issue(&self, account_id: i32, role: Role) -> Result<IssuedToken, AppError> {
        self.issue_with_expiry(account_id, SessionKind::Account, role, self.expire_in)
    }

    /// 为学生档案签发令牌，角色固定为学生
    pub fn issue_for_profile(&self, profile_id: i32) -> Result<IssuedToken, AppError> {
        self.issue_with_expiry(profile_id, SessionKind::Profile, Role::Student, self.expire_in)
    }

    fn issue_with_expiry(
        &self,
        subject: i32,
        kind: SessionKind,
        role: Role,
        expire_in: i64,
    ) -> Result<IssuedToken, AppError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            kind,
            role: role.as_str().to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + expire_in,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("JWT encode failed: {}", e)))?;

        Ok(IssuedToken { token, claims })
    }

    /// 验证并解析 Token
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    #[test]
    fn test_issue_and_verify() {
        let manager = JwtManager::new(SECRET.to_string(), 3600);
        let issued = manager.issue(123, Role::Staff).unwrap();

        let claims = manager.verify_token(&issued.token).unwrap();
        assert_eq!(claims.subject_id().unwrap(), 123);
        assert_eq!(claims.kind, SessionKind::Account);
        assert_eq!(claims.role().unwrap(), Role::Staff);
        assert_eq!(claims.jti, issued.claims.jti);
        assert!(claims.remaining_secs() > 3500);
    }

    #[test]
    fn test_profile_token_carries_its_kind() {
        let manager = JwtManager::new(SECRET.to_string(), 3600);
        let issued = manager.issue_for_profile(42).unwrap();

        let claims = manager.verify_token(&issued.token).unwrap();
        assert_eq!(claims.subject_id().unwrap(), 42);
        assert_eq!(claims.kind, SessionKind::Profile);
        assert_eq!(claims.role().unwrap(), Role::Student);
    }

    #[test]
    fn test_token_without_kind_rejected() {
        let manager = JwtManager::new(SECRET.to_string(), 3600);
        let now = chrono::Utc::now().timestamp();
        let legacy = serde_json::json!({
            "sub": "1",
            "role": "student",
            "jti": "old",
            "iat": now,
            "exp": now + 3600,
        });
        let token = encode(
            &Header::default(),
            &legacy,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            manager.verify_token(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_each_token_has_its_own_id() {
        let manager = JwtManager::new(SECRET.to_string(), 3600);
        let a = manager.issue(1, Role::Student).unwrap();
        let b = manager.issue(1, Role::Student).unwrap();
        assert_ne!(a.claims.jti, b.claims.jti);
    }

    #[test]
    fn test_expired_token() {
        let manager = JwtManager::new(SECRET.to_string(), 3600);
        let issued = manager.issue_with_expiry(123, SessionKind::Account, Role::Admin, -10).unwrap();

        let result = manager.verify_token(&issued.token);
        assert!(matches!(result, Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtManager::new(SECRET.to_string(), 3600);
        let other = JwtManager::new("another-secret-key-also-32-characters-x".to_string(), 3600);
        let issued = issuer.issue(5, Role::Hod).unwrap();

        assert!(matches!(
            other.verify_token(&issued.token),
            Err(AppError::InvalidToken)
        ));
    }
}
