use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{not_found, storage_failure};

/// 已有成功缴费记录的费用不可删除
pub async fn delete_fee(
    service: &FeeService,
    fee_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_fee_by_id(fee_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::FeeNotFound, "Fee not found")),
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to load fee",
                e,
            ));
        }
    }

    match storage.count_completed_payments_for_fee(fee_id).await {
        Ok(0) => {}
        Ok(_) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::FeeHasPayments,
                "Fee has completed payments and cannot be deleted",
            )));
        }
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to check payments",
                e,
            ));
        }
    }

    match storage.delete_fee(fee_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Fee deleted successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::FeeNotFound, "Fee not found")),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to delete fee",
            e,
        )),
    }
}
