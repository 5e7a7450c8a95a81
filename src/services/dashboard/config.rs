use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::role_config::{has_permission, role_config};
use crate::middlewares::RequireJWT;
use crate::models::dashboard::{
    requests::PermissionCheckQuery, responses::PermissionCheckResponse,
};
use crate::models::{ApiResponse, ErrorCode};

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized access, please login",
    ))
}

/// 当前角色的导航、组件与权限
pub async fn get_config(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let Some(role) = RequireJWT::extract_user_role(request) else {
        return Ok(unauthorized());
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        role_config(role),
        "Dashboard config retrieved successfully",
    )))
}

pub async fn check_permission(
    query: PermissionCheckQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(role) = RequireJWT::extract_user_role(request) else {
        return Ok(unauthorized());
    };

    let permission = query.permission.trim().to_string();
    let allowed = has_permission(role, &permission);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PermissionCheckResponse {
            permission,
            allowed,
        },
        "Permission checked",
    )))
}
