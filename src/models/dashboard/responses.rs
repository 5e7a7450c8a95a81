use serde::Serialize;
use ts_rs::TS;

use crate::models::fees::entities::FeeSummary;
use crate::models::users::entities::UserRole;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct PermissionCheckResponse {
    pub permission: String,
    pub allowed: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentSummary {
    pub enrolled_courses: i64,
    pub upcoming_assignments: i64,
    pub gpa: f64,
    pub total_credits: i32,
    /// 查询失败时为空
    pub fee: Option<FeeSummary>,
    pub unread_notifications: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct LecturerSummary {
    pub taught_courses: i64,
    pub ungraded_submissions: i64,
    pub unread_notifications: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct RoleCount {
    pub role: UserRole,
    pub count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct OverviewSummary {
    pub users_by_role: Vec<RoleCount>,
    pub total_courses: i64,
    pub outstanding_fees: f64,
    pub unread_notifications: i64,
}

/// 按角色区分的仪表盘数据
#[derive(Debug, Serialize, TS)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub enum DashboardSummary {
    Student(StudentSummary),
    Lecturer(LecturerSummary),
    Overview(OverviewSummary),
}
