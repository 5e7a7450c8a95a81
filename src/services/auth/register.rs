use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    auth::requests::RegisterRequest,
    users::{
        entities::{UserProfile, UserRole},
        requests::CreateUserRequest,
        responses::UserResponse,
    },
};
use crate::services::system::DynamicConfig;
use crate::services::{bad_request, storage_failure};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{check_password, validate_email, validate_text, validate_username};

use super::AuthService;

/// 自助注册只会创建 active 的学生账号
pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if !DynamicConfig::allow_registration().await {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::RegistrationDisabled,
            "Self registration is currently disabled",
        )));
    }

    let username = register_request.username.trim().to_string();
    let email = register_request.email.trim().to_lowercase();

    if let Err(msg) = validate_username(&username) {
        return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
    }
    if let Err(msg) = validate_email(&email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = check_password(&register_request.password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }

    let profile = match register_request.profile {
        Some(profile) => {
            let name = profile.profile_name.trim().to_string();
            if let Err(msg) = validate_text("profile_name", &name, 64) {
                return Ok(bad_request(ErrorCode::BadRequest, msg));
            }
            UserProfile {
                profile_name: name,
                avatar_url: profile.avatar_url,
            }
        }
        None => UserProfile {
            profile_name: username.clone(),
            avatar_url: None,
        },
    };

    let storage = service.get_storage(request)?;

    if let Err(response) = check_unique(&storage, &username, &email).await {
        return Ok(response);
    }

    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(storage_failure(ErrorCode::RegisterFailed, "Password hashing failed", e)),
    };

    let create_request = CreateUserRequest {
        username,
        email,
        password: password_hash,
        role: UserRole::Student,
        profile,
    };

    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("Student {} registered", user.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user },
                "Registration successful",
            )))
        }
        Err(e) => Ok(storage_failure(ErrorCode::RegisterFailed, "Register failed", e)),
    }
}

/// 用户名与邮箱均不可重复
pub(crate) async fn check_unique(
    storage: &Arc<dyn Storage>,
    username: &str,
    email: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => {
            return Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserNameAlreadyExists,
                "Username already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => return Err(storage_failure(ErrorCode::RegisterFailed, "Register failed", e)),
    }

    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(storage_failure(ErrorCode::RegisterFailed, "Register failed", e)),
    }
}
