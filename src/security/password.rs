use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng};
use argon2::Argon2;

use crate::errors::AppError;

pub struct PasswordManager;

impl PasswordManager {
    /// 对密码进行哈希加密（argon2id）
    pub fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Password hash failed: {}", e)))
    }

    /// 验证密码是否匹配
    ///
    /// 旧系统写入的是 bcrypt（`$2y$` / `$2b$`），新写入的是 argon2。
    /// 无法识别的格式一律不匹配。
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
        if hash.starts_with("$argon2") {
            let parsed = PasswordHash::new(hash)
                .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
            return Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok());
        }

        if hash.starts_with("$2") {
            return bcrypt::verify(password, hash)
                .map_err(|e| AppError::Internal(format!("Password verify failed: {}", e)));
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = "MySecurePassword123!";
        let hash = PasswordManager::hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(PasswordManager::verify_password(password, &hash).unwrap());
        assert!(!PasswordManager::verify_password("WrongPassword", &hash).unwrap());
    }

    #[test]
    fn test_legacy_bcrypt_hash() {
        let hash = bcrypt::hash("student123", 4).unwrap();
        // 旧系统使用 $2y$ 前缀
        let legacy = hash.replacen("$2b$", "$2y$", 1);

        assert!(PasswordManager::verify_password("student123", &legacy).unwrap());
        assert!(!PasswordManager::verify_password("student124", &legacy).unwrap());
    }

    #[test]
    fn test_plaintext_never_matches() {
        assert!(!PasswordManager::verify_password("secret", "secret").unwrap());
        assert!(!PasswordManager::verify_password("", "").unwrap());
    }
}
