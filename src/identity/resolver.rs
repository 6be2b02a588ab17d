use serde::Serialize;

use crate::errors::AppError;
use crate::storage::entities::students;
use crate::storage::{AccountRepository, ProfileRepository};

/// 命中的查找方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// `students.user_id == account_id`
    DirectLink,
    /// `students.id == account_id`（学生用档案 id 登录）
    SameId,
    /// 账号邮箱与档案邮箱规范化后相同
    Email,
}

/// 解析结果
///
/// 找不到是正常结果，不是错误。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileResolution {
    Found {
        profile: students::Model,
        matched_by: MatchStrategy,
    },
    /// 邮箱匹配到多份档案，无法确定，按未关联处理
    Ambiguous { candidates: Vec<i32> },
    NotFound,
}

impl ProfileResolution {
    pub fn profile(&self) -> Option<&students::Model> {
        match self {
            ProfileResolution::Found { profile, .. } => Some(profile),
            _ => None,
        }
    }

    pub fn into_profile(self) -> Option<students::Model> {
        match self {
            ProfileResolution::Found { profile, .. } => Some(profile),
            _ => None,
        }
    }
}

/// 邮箱规范化：去首尾空白并转小写
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 为登录账号找到对应的学生档案
///
/// 依次尝试直接关联、同 id、邮箱匹配，首个命中即返回，后面的不再查询。
/// 只读，不会创建或修复关联。
#[tracing_attributes::instrument(skip(repo))]
pub async fn resolve_profile<R>(repo: &R, account_id: i32) -> Result<ProfileResolution, AppError>
where
    R: AccountRepository + ProfileRepository + ?Sized,
{
    if let Some(profile) = repo.find_profile_by_user_id(account_id).await? {
        return Ok(found(profile, MatchStrategy::DirectLink));
    }

    if let Some(profile) = repo.find_profile(account_id).await? {
        return Ok(found(profile, MatchStrategy::SameId));
    }

    // 账号不存在或邮箱为空时跳过
    let email = repo
        .find_account(account_id)
        .await?
        .map(|account| normalize_email(&account.email))
        .filter(|email| !email.is_empty());

    let Some(email) = email else {
        tracing::debug!("No profile for account {}", account_id);
        return Ok(ProfileResolution::NotFound);
    };

    let mut matches = repo.find_profiles_by_email(&email).await?;
    match matches.len() {
        0 => {
            tracing::debug!("No profile for account {}", account_id);
            Ok(ProfileResolution::NotFound)
        }
        1 => Ok(found(matches.remove(0), MatchStrategy::Email)),
        _ => {
            let candidates: Vec<i32> = matches.iter().map(|p| p.id).collect();
            tracing::warn!(
                "Account {} matches {} profiles by email: {:?}",
                account_id,
                candidates.len(),
                candidates
            );
            Ok(ProfileResolution::Ambiguous { candidates })
        }
    }
}

fn found(profile: students::Model, matched_by: MatchStrategy) -> ProfileResolution {
    tracing::debug!("Resolved profile {} via {:?}", profile.id, matched_by);
    ProfileResolution::Found {
        profile,
        matched_by,
    }
}
