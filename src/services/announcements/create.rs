use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AnnouncementService, MAX_CONTENT_CHARS, MAX_TITLE_CHARS};
use crate::models::announcements::requests::CreateAnnouncementRequest;
use crate::models::notifications::entities::{NotificationTemplate, NotificationType};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::{can_manage_course, load_course};
use crate::services::notifications::NotificationDispatcher;
use crate::services::{bad_request, current_user, forbidden, storage_failure};
use crate::utils::validate::validate_text;

/// 课程公告通知在读学生；全局公告通知目标角色的全部活跃用户
pub async fn create_announcement(
    service: &AnnouncementService,
    mut announcement: CreateAnnouncementRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    announcement.title = announcement.title.trim().to_string();
    announcement.content = announcement.content.trim().to_string();
    if let Err(msg) = validate_text("title", &announcement.title, MAX_TITLE_CHARS) {
        return Ok(bad_request(ErrorCode::AnnouncementInvalid, msg));
    }
    if let Err(msg) = validate_text("content", &announcement.content, MAX_CONTENT_CHARS) {
        return Ok(bad_request(ErrorCode::AnnouncementInvalid, msg));
    }

    let storage = service.get_storage(request)?;

    let course = match announcement.course_id {
        Some(course_id) => {
            let course = match load_course(&storage, course_id).await {
                Ok(course) => course,
                Err(resp) => return Ok(resp),
            };
            if !can_manage_course(&user, &course) {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::CoursePermissionDenied,
                    "You can only post announcements for courses you teach",
                )));
            }
            // 课程公告不区分角色
            announcement.audience = None;
            Some(course)
        }
        None => {
            if !user.role.is_manager() {
                return Ok(forbidden(
                    "Only deans and administrators can post global announcements",
                ));
            }
            None
        }
    };

    let audience = announcement.audience;
    let announcement = match storage.create_announcement(user.id, announcement).await {
        Ok(announcement) => announcement,
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to create announcement",
                e,
            ));
        }
    };

    let (recipients, title) = match course {
        Some(ref course) => (
            storage.list_active_student_ids(course.id).await,
            format!("[{}] {}", course.code, announcement.title),
        ),
        None => (
            storage.list_active_user_ids(audience).await,
            announcement.title.clone(),
        ),
    };

    match recipients {
        Ok(ids) => {
            let template = NotificationTemplate::new(NotificationType::Announcement, title)
                .reference("announcement", announcement.id);
            let author_id = user.id;
            NotificationDispatcher::fan_out(
                &storage,
                ids.into_iter().filter(|id| *id != author_id),
                &template,
            )
            .await;
        }
        Err(e) => tracing::warn!(
            "Failed to resolve recipients for announcement {}: {}",
            announcement.id,
            e
        ),
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(
        announcement,
        "Announcement created successfully",
    )))
}
