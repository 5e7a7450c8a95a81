use serde::Deserialize;
use ts_rs::TS;

use crate::models::users::entities::UserProfile;

// 用户登录请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    /// 用户名或邮箱
    #[serde(alias = "username_or_email")]
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

// 学生自助注册请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub profile: Option<UserProfile>,
}

// 个人资料更新；修改密码时必须提供当前密码
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct UpdateProfileRequest {
    pub profile_name: Option<String>,
    pub avatar_url: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}
