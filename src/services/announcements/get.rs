use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AnnouncementService, global_visible_to, load_announcement};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::{is_course_member, load_course};
use crate::services::{current_user, forbidden, storage_failure};

pub async fn get_announcement(
    service: &AnnouncementService,
    announcement_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let announcement = match load_announcement(&storage, announcement_id).await {
        Ok(announcement) => announcement,
        Err(resp) => return Ok(resp),
    };

    let visible = if announcement.author_id == user.id {
        true
    } else if let Some(course_id) = announcement.course_id {
        let course = match load_course(&storage, course_id).await {
            Ok(course) => course,
            Err(resp) => return Ok(resp),
        };
        match is_course_member(&storage, &user, &course).await {
            Ok(member) => member,
            Err(e) => {
                return Ok(storage_failure(
                    ErrorCode::InternalServerError,
                    "Failed to check course membership",
                    e,
                ));
            }
        }
    } else {
        global_visible_to(&announcement, user.role)
    };

    if !visible {
        return Ok(forbidden("You do not have access to this announcement"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        announcement,
        "Announcement retrieved successfully",
    )))
}
