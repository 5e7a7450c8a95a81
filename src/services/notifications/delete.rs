use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, not_found, storage_failure};

pub async fn delete_notification(
    service: &NotificationService,
    notification_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage.get_notification_by_id(notification_id).await {
        Ok(Some(n)) if n.user_id == user.id => {}
        Ok(_) => {
            return Ok(not_found(
                ErrorCode::NotificationNotFound,
                "Notification not found",
            ));
        }
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to load notification",
                e,
            ));
        }
    }

    match storage.delete_notification(notification_id).await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Notification deleted"))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to delete notification",
            e,
        )),
    }
}
