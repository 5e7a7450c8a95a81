use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::TimeDelta;

use crate::models::auth::responses::{
    RefreshTokenResponse, TokenVerificationResponse, UserInfoResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::dashboard::role_config::role_config;
use crate::services::system::DynamicConfig;
use crate::services::{current_user, storage_failure};
use crate::utils::jwt::JwtUtils;

use super::AuthService;

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let user_id = match JwtUtils::verify_refresh_token(&refresh_token)
        .ok()
        .and_then(|claims| claims.user_id())
    {
        Some(id) => id,
        None => return Ok(expired_session()),
    };

    // 重新读取用户，角色或状态变更后立即生效
    let storage = service.get_storage(request)?;
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.is_active() => user,
        Ok(_) => return Ok(expired_session()),
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Token refresh failed",
                e,
            ));
        }
    };

    let minutes = DynamicConfig::access_token_expiry().await;
    match JwtUtils::generate_access_token_with_expiry(user.id, user.role, TimeDelta::minutes(minutes))
    {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: minutes * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::error!("Refresh token failed: {}", e);
            Ok(expired_session())
        }
    }
}

// 清除无效的 refresh cookie
fn expired_session() -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::expired_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

pub async fn handle_verify_token(
    _service: &AuthService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse { is_valid: true },
        "Token is valid",
    )))
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse {
            dashboard: role_config(user.role),
            user,
        },
        "User information retrieved successfully",
    )))
}
