use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 账号角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Hod,
    Principal,
    Student,
}

/// 可录入成绩和出勤的角色
pub const STAFF_ROLES: &[Role] = &[Role::Admin, Role::Staff, Role::Hod, Role::Principal];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Hod => "hod",
            Role::Principal => "principal",
            Role::Student => "student",
        }
    }

    /// 登录后进入的页面
    pub fn landing(&self) -> &'static str {
        match self {
            Role::Admin => "admin-panel",
            Role::Staff => "staff-panel",
            Role::Hod => "hod-panel",
            Role::Principal => "principal-panel",
            Role::Student => "student-dashboard",
        }
    }

    pub fn is_staff(&self) -> bool {
        STAFF_ROLES.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知角色
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    /// 旧数据里角色大小写不统一，比较时忽略大小写
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            "hod" => Ok(Role::Hod),
            "principal" => Ok(Role::Principal),
            "student" => Ok(Role::Student),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!("HOD".parse::<Role>(), Ok(Role::Hod));
        assert_eq!(" Staff ".parse::<Role>(), Ok(Role::Staff));
        assert_eq!("principal".parse::<Role>(), Ok(Role::Principal));
        assert!("librarian".parse::<Role>().is_err());
    }

    #[test]
    fn test_landing() {
        assert_eq!(Role::Admin.landing(), "admin-panel");
        assert_eq!(Role::Student.landing(), "student-dashboard");
        assert_eq!(Role::Hod.landing(), "hod-panel");
    }

    #[test]
    fn test_staff_roles() {
        assert!(Role::Principal.is_staff());
        assert!(!Role::Student.is_staff());
    }
}
