use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::models::fees::{requests::CreateFeeRequest, responses::FeeResponse};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, not_found, storage_failure};
use crate::utils::validate::validate_text;

pub async fn create_fee(
    service: &FeeService,
    mut fee: CreateFeeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    fee.title = fee.title.trim().to_string();
    if let Err(msg) = validate_text("title", &fee.title, 200) {
        return Ok(bad_request(ErrorCode::FeeInvalid, msg));
    }
    if !fee.amount.is_finite() || fee.amount <= 0.0 {
        return Ok(bad_request(ErrorCode::FeeInvalid, "Amount must be greater than 0"));
    }

    let storage = service.get_storage(request)?;

    // 只能给学生开费用
    match storage.get_user_by_id(fee.student_id).await {
        Ok(Some(student)) if student.role == UserRole::Student => {}
        Ok(Some(_)) => {
            return Ok(bad_request(
                ErrorCode::FeeInvalid,
                "Fees can only be issued to students",
            ));
        }
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "Student not found")),
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to load student",
                e,
            ));
        }
    }

    match storage.create_fee(user.id, fee).await {
        Ok(fee) => {
            tracing::info!(
                "Fee {} of {:.2} issued to student {} by {}",
                fee.id,
                fee.amount,
                fee.student_id,
                user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                FeeResponse { fee },
                "Fee created successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to create fee",
            e,
        )),
    }
}
