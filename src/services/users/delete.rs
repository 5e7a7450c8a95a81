use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, invalidate_sessions, not_found, storage_failure};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 禁止删除当前登录的账号
    if RequireJWT::extract_user_id(request) == Some(user_id) {
        return Ok(bad_request(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        ));
    }

    let storage = service.get_storage(request)?;

    match storage.delete_user(user_id).await {
        Ok(true) => {
            tracing::info!("User {} deleted", user_id);
            invalidate_sessions(request).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(storage_failure(
            ErrorCode::UserDeleteFailed,
            "User deletion failed",
            e,
        )),
    }
}
