use super::resolver::{ProfileResolution, resolve_profile};
use crate::errors::AppError;
use crate::security::{Claims, SessionKind};
use crate::storage::entities::students;
use crate::storage::{AccountRepository, ProfileRepository};

/// 会话令牌对应的学生档案
///
/// 档案登录的令牌直接按 `students.id` 读取；账号登录的令牌走 [`resolve_profile`]。
/// 邮箱匹配到多份档案时返回 `None`。
pub async fn session_profile<R>(
    repo: &R,
    claims: &Claims,
) -> Result<Option<students::Model>, AppError>
where
    R: AccountRepository + ProfileRepository + ?Sized,
{
    let subject = claims.subject_id()?;

    match claims.kind {
        SessionKind::Profile => repo.find_profile(subject).await,
        SessionKind::Account => match resolve_profile(repo, subject).await? {
            ProfileResolution::Found { profile, .. } => Ok(Some(profile)),
            ProfileResolution::Ambiguous { .. } | ProfileResolution::NotFound => Ok(None),
        },
    }
}
