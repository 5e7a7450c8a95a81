use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AnnouncementService, can_delete, load_announcement};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, not_found, storage_failure};

pub async fn delete_announcement(
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
    if !can_delete(&user, &announcement) {
        return Ok(forbidden("You do not have permission to delete this announcement"));
    }

    match storage.delete_announcement(announcement_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Announcement deleted successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        )),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to delete announcement",
            e,
        )),
    }
}
