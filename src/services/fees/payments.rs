use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::models::fees::requests::{PaymentListParams, PaymentListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, storage_failure};

pub async fn list_payments(
    service: &FeeService,
    query: PaymentListParams,
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
                return Ok(forbidden("You can only view your own payments"));
            }
            _ => Some(user.id),
        }
    };

    let storage = service.get_storage(request)?;

    let list_query = PaymentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        student_id,
        fee_id: query.fee_id,
    };

    match storage.list_payments_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Payments retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to retrieve payments",
            e,
        )),
    }
}
