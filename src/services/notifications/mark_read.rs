use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::{ApiResponse, ErrorCode, notifications::responses::MarkAllReadResponse};
use crate::services::{current_user, not_found, storage_failure};

/// 只能标记自己的通知；他人的通知按不存在处理
pub async fn mark_read(
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

    match storage.mark_notification_read(notification_id).await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Notification marked as read"))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to mark notification",
            e,
        )),
    }
}

pub async fn mark_all_read(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage.mark_all_notifications_read(user.id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MarkAllReadResponse {
                marked_count: count as i64,
            },
            "All notifications marked as read",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to mark notifications",
            e,
        )),
    }
}
