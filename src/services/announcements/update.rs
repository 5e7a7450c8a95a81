use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{
    AnnouncementService, MAX_CONTENT_CHARS, MAX_TITLE_CHARS, can_edit, load_announcement,
};
use crate::models::announcements::requests::UpdateAnnouncementRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, forbidden, not_found, storage_failure};
use crate::utils::validate::validate_text;

pub async fn update_announcement(
    service: &AnnouncementService,
    announcement_id: i64,
    mut update: UpdateAnnouncementRequest,
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
    if !can_edit(&user, &announcement) {
        return Ok(forbidden("Only the author or an administrator can edit this announcement"));
    }

    if let Some(ref title) = update.title {
        if let Err(msg) = validate_text("title", title, MAX_TITLE_CHARS) {
            return Ok(bad_request(ErrorCode::AnnouncementInvalid, msg));
        }
        update.title = Some(title.trim().to_string());
    }
    if let Some(ref content) = update.content {
        if let Err(msg) = validate_text("content", content, MAX_CONTENT_CHARS) {
            return Ok(bad_request(ErrorCode::AnnouncementInvalid, msg));
        }
        update.content = Some(content.trim().to_string());
    }

    match storage.update_announcement(announcement_id, update).await {
        Ok(Some(announcement)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            announcement,
            "Announcement updated successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        )),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to update announcement",
            e,
        )),
    }
}
