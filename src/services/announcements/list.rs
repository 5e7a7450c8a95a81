use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnnouncementService;
use crate::models::announcements::requests::{
    AnnouncementListParams, AnnouncementListQuery, AnnouncementVisibility,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

pub async fn list_announcements(
    service: &AnnouncementService,
    query: AnnouncementListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    // 院长/管理员不过滤；其余角色只看相关课程与面向自己角色的全局公告
    let course_ids = match user.role {
        UserRole::Student => storage.list_student_course_ids(user.id).await.map(Some),
        UserRole::Lecturer => storage.list_lecturer_course_ids(user.id).await.map(Some),
        UserRole::Dean | UserRole::Admin => Ok(None),
    };
    let visible_to = match course_ids {
        Ok(ids) => ids.map(|course_ids| AnnouncementVisibility {
            role: user.role,
            course_ids,
        }),
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to resolve visible courses",
                e,
            ));
        }
    };

    let list_query = AnnouncementListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        course_id: query.course_id,
        visible_to,
    };

    match storage.list_announcements_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Announcements retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to retrieve announcements",
            e,
        )),
    }
}
