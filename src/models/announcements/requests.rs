use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::query::deserialize_optional_i64;
use crate::models::users::entities::UserRole;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct CreateAnnouncementRequest {
    pub course_id: Option<i64>,
    pub title: String,
    pub content: String,
    pub audience: Option<UserRole>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
}

/// 存储层可见性过滤
#[derive(Debug, Clone, Default)]
pub struct AnnouncementListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub course_id: Option<i64>,
    /// None 表示不过滤（院长/管理员）
    pub visible_to: Option<AnnouncementVisibility>,
}

#[derive(Debug, Clone)]
pub struct AnnouncementVisibility {
    pub role: UserRole,
    /// 调用者选修或讲授的课程
    pub course_ids: Vec<i64>,
}
