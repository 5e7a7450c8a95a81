pub mod create;
pub mod delete;
pub mod gateway;
pub mod list;
pub mod pay;
pub mod payments;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::fees::requests::{
    CreateFeeRequest, FeeListParams, FeeSummaryParams, PaymentListParams, SubmitPaymentRequest,
};
use crate::storage::Storage;

pub struct FeeService;

impl FeeService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(request)
    }

    pub async fn create_fee(
        &self,
        fee: CreateFeeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_fee(self, fee, request).await
    }

    pub async fn list_fees(
        &self,
        query: FeeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_fees(self, query, request).await
    }

    pub async fn delete_fee(&self, fee_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_fee(self, fee_id, request).await
    }

    pub async fn get_summary(
        &self,
        params: FeeSummaryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        summary::get_summary(self, params, request).await
    }

    pub async fn submit_payment(
        &self,
        fee_id: i64,
        payment: SubmitPaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        pay::submit_payment(self, fee_id, payment, request).await
    }

    pub async fn list_payments(
        &self,
        query: PaymentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        payments::list_payments(self, query, request).await
    }
}
