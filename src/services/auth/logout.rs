use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::{ObjectCache, session_key};
use crate::middlewares::require_jwt::bearer_token;
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// 登出：清除 refresh cookie，并从缓存移除该 access token 对应的会话
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    if let Some(token) = bearer_token(request)
        && let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>()
    {
        cache.remove(&session_key(token)).await;
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::expired_refresh_token_cookie())
        .json(ApiResponse::<()>::success_empty("Logout successful")))
}
