use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::auth::register::check_unique;
use crate::services::{bad_request, storage_failure};
use crate::utils::password::hash_password;
use crate::utils::validate::{check_password, validate_email, validate_text, validate_username};

/// 管理员可创建任意角色的账号
pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    user_data.username = user_data.username.trim().to_string();
    user_data.email = user_data.email.trim().to_lowercase();

    if let Err(msg) = validate_username(&user_data.username) {
        return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
    }
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = check_password(&user_data.password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }
    if user_data.profile.profile_name.trim().is_empty() {
        user_data.profile.profile_name = user_data.username.clone();
    } else if let Err(msg) = validate_text("profile_name", &user_data.profile.profile_name, 64) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request)?;

    if let Err(response) = check_unique(&storage, &user_data.username, &user_data.email).await {
        return Ok(response);
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Password hashing failed",
                e,
            ));
        }
    };

    match storage.create_user(user_data).await {
        Ok(user) => {
            tracing::info!("Created {} account {}", user.role, user.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user },
                "User created successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            ErrorCode::UserCreationFailed,
            "User creation failed",
            e,
        )),
    }
}
