//! 角色 → 导航 / 仪表盘组件 / 权限 的静态映射

use crate::models::dashboard::entities::{NavItem, Permission, RoleConfig, WidgetKind};
use crate::models::users::entities::UserRole;

use Permission::*;

const STUDENT_PERMISSIONS: &[Permission] = &[
    CoursesView,
    CoursesEnroll,
    AssignmentsView,
    AssignmentsSubmit,
    GradesViewOwn,
    FeesViewOwn,
    FeesPay,
    AnnouncementsView,
    NotificationsView,
    FilesUpload,
];

const LECTURER_PERMISSIONS: &[Permission] = &[
    CoursesView,
    CoursesCreate,
    AssignmentsView,
    AssignmentsManage,
    GradesManage,
    AnnouncementsView,
    AnnouncementsCreate,
    NotificationsView,
    FilesUpload,
];

// 在讲师权限之上追加
const DEAN_EXTRA_PERMISSIONS: &[Permission] = &[
    CoursesManage,
    GradesViewAll,
    FeesManage,
    AnnouncementsGlobal,
    ReportsView,
];

pub fn permissions_for(role: UserRole) -> Vec<Permission> {
    match role {
        UserRole::Student => STUDENT_PERMISSIONS.to_vec(),
        UserRole::Lecturer => LECTURER_PERMISSIONS.to_vec(),
        UserRole::Dean => LECTURER_PERMISSIONS
            .iter()
            .chain(DEAN_EXTRA_PERMISSIONS)
            .copied()
            .collect(),
        UserRole::Admin => Permission::ALL.to_vec(),
    }
}

/// 未知的权限字符串一律视为无权限
pub fn has_permission(role: UserRole, permission: &str) -> bool {
    permission
        .parse::<Permission>()
        .is_ok_and(|p| permissions_for(role).contains(&p))
}

fn nav(key: &str, label: &str, path: &str, icon: &str) -> NavItem {
    NavItem {
        key: key.to_string(),
        label: label.to_string(),
        path: path.to_string(),
        icon: icon.to_string(),
    }
}

pub fn navigation_for(role: UserRole) -> Vec<NavItem> {
    let mut items = vec![nav("dashboard", "Dashboard", "/dashboard", "home")];

    match role {
        UserRole::Student => items.extend([
            nav("courses", "My Courses", "/courses", "book"),
            nav("assignments", "Assignments", "/assignments", "clipboard"),
            nav("grades", "Grades", "/grades", "award"),
            nav("fees", "Fees", "/fees", "credit-card"),
        ]),
        UserRole::Lecturer => items.extend([
            nav("courses", "My Courses", "/courses", "book"),
            nav("assignments", "Assignments", "/assignments", "clipboard"),
            nav("grading", "Grading", "/grading", "check-square"),
        ]),
        UserRole::Dean => items.extend([
            nav("courses", "Courses", "/courses", "book"),
            nav("grades", "Grades", "/grades", "award"),
            nav("fees", "Fees", "/fees", "credit-card"),
            nav("reports", "Reports", "/reports", "bar-chart"),
        ]),
        UserRole::Admin => items.extend([
            nav("users", "Users", "/users", "users"),
            nav("courses", "Courses", "/courses", "book"),
            nav("fees", "Fees", "/fees", "credit-card"),
            nav("reports", "Reports", "/reports", "bar-chart"),
            nav("settings", "Settings", "/settings", "settings"),
        ]),
    }

    items.extend([
        nav("announcements", "Announcements", "/announcements", "megaphone"),
        nav("notifications", "Notifications", "/notifications", "bell"),
    ]);
    items
}

pub fn widgets_for(role: UserRole) -> Vec<WidgetKind> {
    use WidgetKind::*;
    match role {
        UserRole::Student => vec![
            EnrolledCourses,
            UpcomingAssignments,
            GpaSummary,
            FeeStatus,
            Announcements,
            Notifications,
        ],
        UserRole::Lecturer => vec![TaughtCourses, GradingQueue, Announcements, Notifications],
        UserRole::Dean => vec![
            UserStatistics,
            CourseStatistics,
            FeeOverview,
            Announcements,
            Notifications,
        ],
        UserRole::Admin => vec![
            UserStatistics,
            CourseStatistics,
            FeeOverview,
            SystemSettings,
            Announcements,
            Notifications,
        ],
    }
}

pub fn role_config(role: UserRole) -> RoleConfig {
    RoleConfig {
        role,
        navigation: navigation_for(role),
        widgets: widgets_for(role),
        permissions: permissions_for(role),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn set(perms: &[&str]) -> HashSet<String> {
        perms.iter().map(|s| s.to_string()).collect()
    }

    fn actual(role: UserRole) -> HashSet<String> {
        permissions_for(role)
            .iter()
            .map(|p| p.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_student_permissions() {
        assert_eq!(
            actual(UserRole::Student),
            set(&[
                "courses:view",
                "courses:enroll",
                "assignments:view",
                "assignments:submit",
                "grades:view_own",
                "fees:view_own",
                "fees:pay",
                "announcements:view",
                "notifications:view",
                "files:upload",
            ])
        );
    }

    #[test]
    fn test_lecturer_permissions() {
        assert_eq!(
            actual(UserRole::Lecturer),
            set(&[
                "courses:view",
                "courses:create",
                "assignments:view",
                "assignments:manage",
                "grades:manage",
                "announcements:view",
                "announcements:create",
                "notifications:view",
                "files:upload",
            ])
        );
    }

    #[test]
    fn test_dean_extends_lecturer() {
        let dean = actual(UserRole::Dean);
        assert!(actual(UserRole::Lecturer).is_subset(&dean));
        let extra: HashSet<String> = dean
            .difference(&actual(UserRole::Lecturer))
            .cloned()
            .collect();
        assert_eq!(
            extra,
            set(&[
                "courses:manage",
                "grades:view_all",
                "fees:manage",
                "announcements:global",
                "reports:view",
            ])
        );
        assert!(!dean.contains("users:manage"));
        assert!(!dean.contains("settings:manage"));
    }

    #[test]
    fn test_admin_has_everything() {
        assert_eq!(permissions_for(UserRole::Admin).len(), Permission::ALL.len());
        for p in Permission::ALL {
            assert!(has_permission(UserRole::Admin, p.as_str()));
        }
    }

    #[test]
    fn test_has_permission_lookup() {
        assert!(has_permission(UserRole::Student, "fees:pay"));
        assert!(!has_permission(UserRole::Student, "grades:manage"));
        assert!(!has_permission(UserRole::Lecturer, "fees:pay"));
        assert!(!has_permission(UserRole::Admin, "courses:destroy"));
        assert!(!has_permission(UserRole::Admin, ""));
    }

    #[test]
    fn test_navigation_and_widgets() {
        let student_nav: Vec<String> = navigation_for(UserRole::Student)
            .into_iter()
            .map(|n| n.key)
            .collect();
        assert!(student_nav.contains(&"fees".to_string()));
        assert!(!student_nav.contains(&"users".to_string()));

        let admin_nav: Vec<String> = navigation_for(UserRole::Admin)
            .into_iter()
            .map(|n| n.key)
            .collect();
        assert!(admin_nav.contains(&"settings".to_string()));
        assert_eq!(admin_nav.first().map(String::as_str), Some("dashboard"));

        assert!(widgets_for(UserRole::Student).contains(&WidgetKind::GpaSummary));
        assert!(widgets_for(UserRole::Lecturer).contains(&WidgetKind::GradingQueue));
        assert!(!widgets_for(UserRole::Dean).contains(&WidgetKind::SystemSettings));

        let config = role_config(UserRole::Dean);
        assert_eq!(config.role, UserRole::Dean);
        assert_eq!(config.permissions, permissions_for(UserRole::Dean));
    }
}
