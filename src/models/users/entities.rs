use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Admin,       // 管理员
    Coordinator, // 单元负责人 (UC)
    Assistant,   // 助教 (TA)
    Tutor,       // 导师
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const COORDINATOR: &'static str = "coordinator";
    pub const ASSISTANT: &'static str = "assistant";
    pub const TUTOR: &'static str = "tutor";

    /// 可管理分配的角色
    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Coordinator]
    }
    /// 可审核申请的角色
    pub fn reviewer_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Coordinator, &Self::Assistant]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Coordinator, &Self::Assistant, &Self::Tutor]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: admin, coordinator, assistant, tutor"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
            UserRole::Coordinator => write!(f, "{}", UserRole::COORDINATOR),
            UserRole::Assistant => write!(f, "{}", UserRole::ASSISTANT),
            UserRole::Tutor => write!(f, "{}", UserRole::TUTOR),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::COORDINATOR => Ok(UserRole::Coordinator),
            UserRole::ASSISTANT => Ok(UserRole::Assistant),
            UserRole::TUTOR => Ok(UserRole::Tutor),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
