use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::UpdateUserRequest, responses::UserResponse},
};
use crate::services::{bad_request, invalidate_sessions, not_found, storage_failure};
use crate::utils::password::hash_password;
use crate::utils::validate::{check_password, validate_email, validate_text};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Some(email) = update_data.email.take() {
        let email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(&email) {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }
        match storage.get_user_by_email(&email).await {
            Ok(Some(existing)) if existing.id != user_id => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::UserEmailAlreadyExists,
                    "Email already exists",
                )));
            }
            Ok(_) => {}
            Err(e) => {
                return Ok(storage_failure(
                    ErrorCode::UserUpdateFailed,
                    "User update failed",
                    e,
                ));
            }
        }
        update_data.email = Some(email);
    }

    if let Some(profile) = &update_data.profile
        && let Err(msg) = validate_text("profile_name", profile.profile_name.trim(), 64)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    if let Some(password) = update_data.password.take() {
        if let Err(msg) = check_password(&password) {
            return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
        }
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => {
                return Ok(storage_failure(
                    ErrorCode::InternalServerError,
                    "Password hashing failed",
                    e,
                ));
            }
        }
    }

    let revokes_sessions = update_data.role.is_some()
        || update_data.status.is_some()
        || update_data.password.is_some();

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            if revokes_sessions {
                invalidate_sessions(request).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "User updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(storage_failure(
            ErrorCode::UserUpdateFailed,
            "User update failed",
            e,
        )),
    }
}
