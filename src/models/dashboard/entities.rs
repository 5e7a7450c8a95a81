use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserRole;

/// 权限字符串，格式为 `resource:action`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub enum Permission {
    #[serde(rename = "courses:view")]
    CoursesView,
    #[serde(rename = "courses:create")]
    CoursesCreate,
    #[serde(rename = "courses:manage")]
    CoursesManage,
    #[serde(rename = "courses:enroll")]
    CoursesEnroll,
    #[serde(rename = "assignments:view")]
    AssignmentsView,
    #[serde(rename = "assignments:submit")]
    AssignmentsSubmit,
    #[serde(rename = "assignments:manage")]
    AssignmentsManage,
    #[serde(rename = "grades:view_own")]
    GradesViewOwn,
    #[serde(rename = "grades:manage")]
    GradesManage,
    #[serde(rename = "grades:view_all")]
    GradesViewAll,
    #[serde(rename = "fees:view_own")]
    FeesViewOwn,
    #[serde(rename = "fees:pay")]
    FeesPay,
    #[serde(rename = "fees:manage")]
    FeesManage,
    #[serde(rename = "announcements:view")]
    AnnouncementsView,
    #[serde(rename = "announcements:create")]
    AnnouncementsCreate,
    #[serde(rename = "announcements:global")]
    AnnouncementsGlobal,
    #[serde(rename = "notifications:view")]
    NotificationsView,
    #[serde(rename = "files:upload")]
    FilesUpload,
    #[serde(rename = "users:manage")]
    UsersManage,
    #[serde(rename = "reports:view")]
    ReportsView,
    #[serde(rename = "settings:manage")]
    SettingsManage,
}

impl Permission {
    pub const ALL: [Permission; 21] = [
        Permission::CoursesView,
        Permission::CoursesCreate,
        Permission::CoursesManage,
        Permission::CoursesEnroll,
        Permission::AssignmentsView,
        Permission::AssignmentsSubmit,
        Permission::AssignmentsManage,
        Permission::GradesViewOwn,
        Permission::GradesManage,
        Permission::GradesViewAll,
        Permission::FeesViewOwn,
        Permission::FeesPay,
        Permission::FeesManage,
        Permission::AnnouncementsView,
        Permission::AnnouncementsCreate,
        Permission::AnnouncementsGlobal,
        Permission::NotificationsView,
        Permission::FilesUpload,
        Permission::UsersManage,
        Permission::ReportsView,
        Permission::SettingsManage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CoursesView => "courses:view",
            Permission::CoursesCreate => "courses:create",
            Permission::CoursesManage => "courses:manage",
            Permission::CoursesEnroll => "courses:enroll",
            Permission::AssignmentsView => "assignments:view",
            Permission::AssignmentsSubmit => "assignments:submit",
            Permission::AssignmentsManage => "assignments:manage",
            Permission::GradesViewOwn => "grades:view_own",
            Permission::GradesManage => "grades:manage",
            Permission::GradesViewAll => "grades:view_all",
            Permission::FeesViewOwn => "fees:view_own",
            Permission::FeesPay => "fees:pay",
            Permission::FeesManage => "fees:manage",
            Permission::AnnouncementsView => "announcements:view",
            Permission::AnnouncementsCreate => "announcements:create",
            Permission::AnnouncementsGlobal => "announcements:global",
            Permission::NotificationsView => "notifications:view",
            Permission::FilesUpload => "files:upload",
            Permission::UsersManage => "users:manage",
            Permission::ReportsView => "reports:view",
            Permission::SettingsManage => "settings:manage",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown permission: {s}"))
    }
}

/// 仪表盘组件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub enum WidgetKind {
    EnrolledCourses,
    UpcomingAssignments,
    GpaSummary,
    FeeStatus,
    TaughtCourses,
    GradingQueue,
    Announcements,
    Notifications,
    UserStatistics,
    CourseStatistics,
    FeeOverview,
    SystemSettings,
}

/// 侧边栏导航项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct NavItem {
    pub key: String,
    pub label: String,
    pub path: String,
    pub icon: String,
}

/// 某个角色可见的导航、组件与权限
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct RoleConfig {
    pub role: UserRole,
    pub navigation: Vec<NavItem>,
    pub widgets: Vec<WidgetKind>,
    pub permissions: Vec<Permission>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_string_forms_are_consistent() {
        for p in Permission::ALL {
            let json = serde_json::to_string(&p).unwrap();
            assert_eq!(json, format!("\"{}\"", p.as_str()));
            assert_eq!(p.as_str().parse::<Permission>().unwrap(), p);
        }
    }

    #[test]
    fn test_unknown_permission() {
        assert!("courses:delete".parse::<Permission>().is_err());
        assert!("".parse::<Permission>().is_err());
    }
}
