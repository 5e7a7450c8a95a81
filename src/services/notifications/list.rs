use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::{
    ApiResponse, ErrorCode,
    notifications::requests::{NotificationListParams, NotificationListQuery},
};
use crate::services::{current_user, storage_failure};

pub async fn list_notifications(
    service: &NotificationService,
    query: NotificationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let list_query = NotificationListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        unread_only: query.unread_only.unwrap_or(false),
    };

    match storage
        .list_notifications_with_pagination(user.id, list_query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Notifications retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to retrieve notifications",
            e,
        )),
    }
}
