//! 缴费概况与选课资格

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::FeeService;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::fees::{entities::FeeSummary, requests::FeeSummaryParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::system::DynamicConfig;
use crate::services::{current_user, forbidden, storage_failure};
use crate::storage::Storage;

/// 已缴百分比；应缴为 0 时视为已全部缴清
pub fn paid_percentage(total: f64, paid: f64) -> f64 {
    if total <= 0.0 {
        return 100.0;
    }
    (paid * 100.0 / total).clamp(0.0, 100.0)
}

pub fn can_register(paid_percentage: f64, threshold: f64) -> bool {
    paid_percentage >= threshold
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 汇总应缴与已缴；金额取两位小数，百分比保持原值以免和资格判断不一致
pub fn summarize(
    student_id: i64,
    total: f64,
    paid: f64,
    threshold: f64,
    currency: String,
) -> FeeSummary {
    let percentage = paid_percentage(total, paid);
    FeeSummary {
        student_id,
        total: round2(total),
        paid: round2(paid),
        balance: round2((total - paid).max(0.0)),
        paid_percentage: percentage,
        threshold,
        can_register: can_register(percentage, threshold),
        currency,
    }
}

pub async fn fee_summary(storage: &Arc<dyn Storage>, student_id: i64) -> Result<FeeSummary> {
    let (total, paid) = storage.get_student_fee_totals(student_id).await?;
    let threshold = DynamicConfig::registration_threshold().await;

    Ok(summarize(
        student_id,
        total,
        paid,
        threshold,
        AppConfig::get().fees.currency.clone(),
    ))
}

/// 选课资格；任何查询失败都按不允许处理
pub async fn registration_eligibility(storage: &Arc<dyn Storage>, student_id: i64) -> bool {
    match fee_summary(storage, student_id).await {
        Ok(summary) => summary.can_register,
        Err(e) => {
            tracing::warn!(
                "Fee lookup failed for student {}, registration disabled: {}",
                student_id,
                e
            );
            false
        }
    }
}

pub async fn get_summary(
    service: &FeeService,
    params: FeeSummaryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let student_id = match params.student_id {
        Some(id) if id != user.id && !user.role.is_manager() => {
            return Ok(forbidden("You can only view your own fees"));
        }
        Some(id) => id,
        None => user.id,
    };

    let storage = service.get_storage(request)?;

    match fee_summary(&storage, student_id).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            summary,
            "Fee summary retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to compute fee summary",
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_register_threshold() {
        assert!(can_register(60.0, 60.0));
        assert!(can_register(100.0, 60.0));
        assert!(!can_register(59.99, 60.0));
        assert!(can_register(0.0, 0.0));
        assert!(!can_register(99.0, 100.0));
    }

    #[test]
    fn test_paid_percentage() {
        assert_eq!(paid_percentage(0.0, 0.0), 100.0);
        assert_eq!(paid_percentage(1000.0, 250.0), 25.0);
        assert_eq!(paid_percentage(1000.0, 1000.0), 100.0);
        assert_eq!(paid_percentage(500.0, 900.0), 100.0);
    }

    #[test]
    fn test_no_fees_means_eligible() {
        assert!(can_register(paid_percentage(0.0, 0.0), 60.0));
    }

    #[test]
    fn test_summary_percentage_matches_eligibility() {
        // 59.996% 不满足 60% 的门槛，展示值也不能显示为 60
        let summary = summarize(3, 10_000.0, 5_999.6, 60.0, "USD".into());
        assert!(!summary.can_register);
        assert!(summary.paid_percentage < 60.0);
        assert_eq!(summary.paid, 5999.6);
        assert_eq!(summary.balance, 4000.4);

        let settled = summarize(3, 10_000.0, 6_000.0, 60.0, "USD".into());
        assert!(settled.can_register);
        assert_eq!(settled.paid_percentage, 60.0);
    }
}
