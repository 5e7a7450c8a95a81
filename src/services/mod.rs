pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod fees;
pub mod files;
pub mod grades;
pub mod notifications;
pub mod submissions;
pub mod system;
pub mod users;

pub use announcements::AnnouncementService;
pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use dashboard::DashboardService;
pub use fees::FeeService;
pub use files::FileService;
pub use grades::GradeService;
pub use notifications::NotificationService;
pub use submissions::SubmissionService;
pub use system::SystemService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, error::ErrorInternalServerError};
use std::fmt::Display;
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::User};
use crate::storage::Storage;

/// 从 app_data 取存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| ErrorInternalServerError("Storage not found in app data"))
}

/// 当前登录用户；路由没有挂 RequireJWT 时给出 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

/// 存储层失败：记录日志并返回 500
pub(crate) fn storage_failure(code: ErrorCode, context: &str, err: impl Display) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    HttpResponse::InternalServerError()
        .json(ApiResponse::error_empty(code, format!("{context}: {err}")))
}

pub(crate) fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

/// 会话按 token 缓存，无法按用户定位；账号角色或状态变化后清空全部会话
pub(crate) async fn invalidate_sessions(request: &HttpRequest) {
    if let Some(cache) = request.app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>() {
        cache.invalidate_all().await;
        tracing::info!("Session cache cleared after account change");
    }
}
