pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod fees;
pub mod files;
pub mod frontend;
pub mod grades;
pub mod notifications;
pub mod submissions;
pub mod system;
pub mod users;

pub use announcements::configure_announcement_routes;
pub use assignments::configure_assignment_routes;
pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use dashboard::configure_dashboard_routes;
pub use fees::configure_fee_routes;
pub use files::configure_file_routes;
pub use frontend::configure_frontend_routes;
pub use grades::configure_grade_routes;
pub use notifications::configure_notification_routes;
pub use submissions::configure_submission_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部路由；前端兜底路由必须最后注册
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_auth_routes(cfg);
    configure_user_routes(cfg);
    configure_dashboard_routes(cfg);
    configure_course_routes(cfg);
    configure_assignment_routes(cfg);
    configure_submission_routes(cfg);
    configure_grade_routes(cfg);
    configure_fee_routes(cfg);
    configure_notification_routes(cfg);
    configure_announcement_routes(cfg);
    configure_file_routes(cfg);
    configure_system_routes(cfg);
    configure_frontend_routes(cfg);
}
