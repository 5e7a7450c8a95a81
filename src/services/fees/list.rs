use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::models::fees::requests::{FeeListParams, FeeListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, storage_failure};

/// 学生只能看自己的；院长/管理员可按学生筛选或查看全部
pub async fn list_fees(
    service: &FeeService,
    query: FeeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let student_id = if user.role.is_manager() {
        query.student_id
    } else {
        match query.student_id {
            Some(id) if id != user.id => {
                return Ok(forbidden("You can only view your own fees"));
            }
            _ => Some(user.id),
        }
    };

    let storage = service.get_storage(request)?;

    let list_query = FeeListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        student_id,
    };

    match storage.list_fees_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Fees retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to retrieve fees",
            e,
        )),
    }
}
