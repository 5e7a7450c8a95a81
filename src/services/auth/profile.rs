use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::{ObjectCache, session_key};
use crate::middlewares::require_jwt::bearer_token;
use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, not_found, storage_failure};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::{check_password, validate_text};

use super::AuthService;

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session_user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    // 会话缓存里没有密码哈希，从存储重新读取
    let user = match storage.get_user_by_id(session_user.id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(storage_failure(ErrorCode::UserUpdateFailed, "Failed to load user", e)),
    };

    let mut profile = user.profile.clone();
    if let Some(name) = update_data.profile_name {
        let name = name.trim().to_string();
        if let Err(msg) = validate_text("profile_name", &name, 64) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        profile.profile_name = name;
    }
    if let Some(avatar) = update_data.avatar_url {
        let avatar = avatar.trim().to_string();
        profile.avatar_url = if avatar.is_empty() {
            None
        } else {
            if let Err(msg) = validate_text("avatar_url", &avatar, 512) {
                return Ok(bad_request(ErrorCode::BadRequest, msg));
            }
            Some(avatar)
        };
    }

    // 修改密码必须提供正确的当前密码
    let password = match update_data.new_password {
        Some(new_password) => {
            let current_ok = update_data
                .current_password
                .as_deref()
                .is_some_and(|current| verify_password(current, &user.password_hash));
            if !current_ok {
                return Ok(bad_request(
                    ErrorCode::UserPasswordInvalid,
                    "Current password is incorrect",
                ));
            }
            if let Err(msg) = check_password(&new_password) {
                return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
            }
            match hash_password(&new_password) {
                Ok(hash) => Some(hash),
                Err(e) => {
                    return Ok(storage_failure(
                        ErrorCode::InternalServerError,
                        "Password hashing failed",
                        e,
                    ));
                }
            }
        }
        None => None,
    };

    // 角色与状态只能由管理员修改
    let update = UpdateUserRequest {
        password,
        profile: Some(profile),
        ..Default::default()
    };

    match storage.update_user(user.id, update).await {
        Ok(Some(user)) => {
            if let Some(token) = bearer_token(request)
                && let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>()
            {
                cache.remove(&session_key(token)).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Profile updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(storage_failure(ErrorCode::UserUpdateFailed, "Failed to update profile", e)),
    }
}
