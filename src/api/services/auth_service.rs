use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::middleware::claims_of;
use crate::errors::AppError;
use crate::identity::normalize_email;
use crate::revocation::{CompositeRevocations, RevocationStore};
use crate::security::{IssuedToken, JwtManager, PasswordManager, Role};
use crate::storage::{AccountRepository, ProfileRepository, SeaOrmBackend};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub role: Role,
    /// 前端据此跳转到对应面板
    pub landing: String,
    pub name: String,
}

impl LoginResponse {
    fn new(issued: IssuedToken, role: Role, name: String) -> Self {
        Self {
            expires_in: issued.claims.exp - issued.claims.iat,
            access_token: issued.token,
            token_type: "Bearer".to_string(),
            role,
            landing: role.landing().to_string(),
            name,
        }
    }
}

impl LoginRequest {
    /// 去掉邮箱首尾空白，两项都不能为空
    fn validated(&self) -> Result<(&str, &str), AppError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(AppError::BadRequest(
                "Please enter both email and password".into(),
            ));
        }
        Ok((email, self.password.as_str()))
    }
}

/// POST /api/auth/login
///
/// 管理员、教职工、HOD、校长（以及有账号的学生）登录。
pub async fn login(
    req: web::Json<LoginRequest>,
    storage: web::Data<Arc<SeaOrmBackend>>,
    jwt_manager: web::Data<Arc<JwtManager>>,
) -> Result<HttpResponse, AppError> {
    let (email, password) = req.validated()?;

    // 1. 查找账号
    let user = storage
        .find_account_by_email(email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    // 2. 验证密码
    if !PasswordManager::verify_password(password, &user.password)? {
        return Err(AppError::InvalidCredentials);
    }

    // 3. 角色
    let role: Role = user.role.parse().map_err(|_| {
        tracing::warn!("User {} has undefined role: {}", user.id, user.role);
        AppError::Forbidden("Login successful, but your role is undefined".into())
    })?;

    // 4. 签发令牌
    let issued = jwt_manager.issue(user.id, role)?;

    tracing::info!("User logged in: id={}, role={}", user.id, role);

    Ok(HttpResponse::Ok().json(LoginResponse::new(issued, role, user.display_name())))
}

/// POST /api/auth/student-login
///
/// 学生用档案里的邮箱和密码登录，令牌的 sub 是 `students.id`。
pub async fn student_login(
    req: web::Json<LoginRequest>,
    storage: web::Data<Arc<SeaOrmBackend>>,
    jwt_manager: web::Data<Arc<JwtManager>>,
) -> Result<HttpResponse, AppError> {
    let (email, password) = req.validated()?;

    let candidates = storage
        .find_profiles_by_email(&normalize_email(email))
        .await?;

    let mut matched = None;
    for student in candidates {
        let Some(hash) = student.password.as_deref() else {
            continue;
        };
        if PasswordManager::verify_password(password, hash)? {
            matched = Some(student);
            break;
        }
    }
    let student = matched.ok_or(AppError::InvalidCredentials)?;

    let issued = jwt_manager.issue_for_profile(student.id)?;

    tracing::info!("Student logged in: id={}", student.id);

    let name = student
        .student_name
        .clone()
        .unwrap_or_else(|| email.to_string());
    Ok(HttpResponse::Ok().json(LoginResponse::new(issued, Role::Student, name)))
}

/// POST /api/auth/logout
///
/// 当前令牌加入吊销表，直到其自然过期。
pub async fn logout(
    req: HttpRequest,
    revocations: web::Data<Arc<CompositeRevocations>>,
) -> Result<HttpResponse, AppError> {
    let claims = claims_of(&req)?;

    revocations
        .revoke(&claims.jti, claims.remaining_secs())
        .await?;

    tracing::info!("Logged out: sub={}, role={}", claims.sub, claims.role);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Logged out",
    })))
}
