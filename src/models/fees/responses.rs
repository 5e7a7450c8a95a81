use serde::Serialize;
use ts_rs::TS;

use super::entities::{Fee, FeeSummary, FeeWithBalance, Payment};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeListResponse {
    pub items: Vec<FeeWithBalance>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeResponse {
    pub fee: Fee,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct PaymentListResponse {
    pub items: Vec<Payment>,
    pub pagination: PaginationInfo,
}

// 缴费结果；失败的尝试同样返回记录
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct PaymentResultResponse {
    pub payment: Payment,
    pub summary: FeeSummary,
}
