use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::TimeDelta;

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::services::dashboard::role_config::role_config;
use crate::services::storage_failure;
use crate::services::system::DynamicConfig;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 1. 用户名或邮箱查找
    let user = match storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(invalid_credentials()),
        Err(e) => return Ok(storage_failure(ErrorCode::InternalServerError, "Login failed", e)),
    };

    // 2. 校验密码
    if !verify_password(&login_request.password, &user.password_hash) {
        tracing::info!("Failed login attempt for {}", user.username);
        return Ok(invalid_credentials());
    }

    // 3. 只允许 active 账号登录
    if !user.is_active() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            format!("Account is {}", user.status),
        )));
    }

    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.id, e);
    }

    // 4. 签发令牌，有效期取动态配置
    let access_minutes = DynamicConfig::access_token_expiry().await;
    let refresh_ttl = if login_request.remember_me {
        TimeDelta::days(DynamicConfig::refresh_token_remember_me_expiry().await)
    } else {
        TimeDelta::days(DynamicConfig::refresh_token_expiry().await)
    };

    let tokens = JwtUtils::generate_access_token_with_expiry(
        user.id,
        user.role,
        TimeDelta::minutes(access_minutes),
    )
    .and_then(|access| {
        JwtUtils::generate_refresh_token(user.id, user.role, Some(refresh_ttl))
            .map(|refresh| (access, refresh))
    });

    let (access_token, refresh_token) = match tokens {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            );
        }
    };

    tracing::info!("User {} ({}) logged in", user.username, user.role);

    let response = LoginResponse {
        access_token,
        expires_in: access_minutes * 60,
        dashboard: role_config(user.role),
        user,
        created_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::refresh_token_cookie(&refresh_token, refresh_ttl))
        .json(ApiResponse::success(response, "Login successful")))
}

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    ))
}
