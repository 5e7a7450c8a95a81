use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use once_cell::sync::Lazy;
use tokio::sync::Mutex;

use super::FeeService;
use super::gateway::{ChargeRequest, PaymentGateway, SimulatedGateway};
use super::summary::fee_summary;
use crate::models::fees::{
    entities::PaymentStatus,
    requests::{NewPayment, SubmitPaymentRequest},
    responses::PaymentResultResponse,
};
use crate::models::notifications::entities::{NotificationTemplate, NotificationType};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::notifications::NotificationDispatcher;
use crate::services::{bad_request, current_user, not_found, storage_failure};
use crate::utils::random_code::generate_payment_reference;

// 金额比较的容差
const AMOUNT_EPSILON: f64 = 1e-6;

const PAYMENT_LOCK_STRIPES: usize = 64;

/// 同一笔费用的缴款串行执行：余额检查、网关扣款与写入记录之间不允许交错。
/// 只在单进程内生效
static PAYMENT_LOCKS: Lazy<Vec<Mutex<()>>> =
    Lazy::new(|| (0..PAYMENT_LOCK_STRIPES).map(|_| Mutex::new(())).collect());

fn payment_lock(fee_id: i64) -> &'static Mutex<()> {
    &PAYMENT_LOCKS[fee_id.rem_euclid(PAYMENT_LOCK_STRIPES as i64) as usize]
}

/// 学生为自己的费用缴款；无论成功与否都会留下记录并通知学生
pub async fn submit_payment(
    service: &FeeService,
    fee_id: i64,
    payment: SubmitPaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let fee = match storage.get_fee_by_id(fee_id).await {
        Ok(Some(fee)) if fee.student_id == user.id => fee,
        Ok(_) => return Ok(not_found(ErrorCode::FeeNotFound, "Fee not found")),
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to load fee",
                e,
            ));
        }
    };

    if !payment.amount.is_finite() || payment.amount <= 0.0 {
        return Ok(bad_request(
            ErrorCode::PaymentInvalid,
            "Payment amount must be greater than 0",
        ));
    }

    let guard = payment_lock(fee.id).lock().await;

    let paid = match storage.sum_completed_payments_for_fee(fee.id).await {
        Ok(paid) => paid,
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to load payments",
                e,
            ));
        }
    };
    let outstanding = (fee.amount - paid).max(0.0);

    if outstanding <= AMOUNT_EPSILON {
        return Ok(bad_request(ErrorCode::PaymentInvalid, "Fee is already settled"));
    }
    if payment.amount > outstanding + AMOUNT_EPSILON {
        return Ok(bad_request(
            ErrorCode::PaymentInvalid,
            format!("Payment amount exceeds the outstanding balance of {outstanding:.2}"),
        ));
    }

    let charge = ChargeRequest {
        reference: generate_payment_reference(),
        amount: payment.amount,
        method: payment.method,
    };
    let gateway = SimulatedGateway::from_settings().await;
    let outcome = gateway.charge(&charge).await;

    let record = NewPayment {
        fee_id: fee.id,
        student_id: user.id,
        amount: charge.amount,
        method: charge.method,
        status: if outcome.is_approved() {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Failed
        },
        reference: charge.reference,
        message: Some(outcome.message().to_string()),
    };

    let payment = match storage.create_payment(record).await {
        Ok(payment) => payment,
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to record payment",
                e,
            ));
        }
    };

    drop(guard);

    let title = if outcome.is_approved() {
        format!("Payment of {:.2} received for {}", payment.amount, fee.title)
    } else {
        format!("Payment of {:.2} for {} failed", payment.amount, fee.title)
    };
    let template = NotificationTemplate::new(NotificationType::PaymentResult, title)
        .content(outcome.message())
        .reference("payment", payment.id);
    NotificationDispatcher::notify(&storage, user.id, &template).await;

    let summary = match fee_summary(&storage, user.id).await {
        Ok(summary) => summary,
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to compute fee summary",
                e,
            ));
        }
    };

    let response = PaymentResultResponse { payment, summary };

    if outcome.is_approved() {
        Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Payment completed")))
    } else {
        Ok(HttpResponse::PaymentRequired().json(ApiResponse::error(
            ErrorCode::PaymentFailed,
            response,
            "Payment failed",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_lock_is_stable_per_fee() {
        assert!(std::ptr::eq(payment_lock(7), payment_lock(7)));
        assert!(std::ptr::eq(payment_lock(7), payment_lock(7 + PAYMENT_LOCK_STRIPES as i64)));
        assert!(!std::ptr::eq(payment_lock(7), payment_lock(8)));
        // 负数 id 也落在范围内
        let _ = payment_lock(-1);
    }
}
