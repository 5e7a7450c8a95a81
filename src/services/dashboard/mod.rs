pub mod config;
pub mod role_config;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::dashboard::requests::PermissionCheckQuery;
use crate::storage::Storage;

pub struct DashboardService;

impl DashboardService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(request)
    }

    pub async fn get_config(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        config::get_config(request).await
    }

    pub async fn check_permission(
        &self,
        query: PermissionCheckQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        config::check_permission(query, request).await
    }

    pub async fn get_summary(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        summary::get_summary(self, request).await
    }
}
