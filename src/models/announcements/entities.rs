use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct Announcement {
    pub id: i64,
    pub author_id: i64,
    /// 为空表示全局公告
    pub course_id: Option<i64>,
    pub title: String,
    pub content: String,
    /// 全局公告的目标角色，为空表示所有人
    pub audience: Option<UserRole>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
