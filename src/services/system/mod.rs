pub mod pwa;
pub mod settings;
pub mod settings_cache;

pub use pwa::versioned_cache_name;
pub use settings_cache::DynamicConfig;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::system::requests::{SettingAuditQuery, UpdateSettingRequest};
use crate::storage::Storage;

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(request)
    }

    pub async fn get_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        settings::get_settings(self, request).await
    }

    pub async fn get_admin_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        settings::get_admin_settings(self, request).await
    }

    pub async fn update_setting(
        &self,
        key: String,
        update: UpdateSettingRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        settings::update_setting(self, key, update, request).await
    }

    pub async fn get_setting_audits(
        &self,
        query: SettingAuditQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        settings::get_setting_audits(self, query, request).await
    }

    pub async fn pwa_version(&self) -> ActixResult<HttpResponse> {
        pwa::pwa_version(self).await
    }
}
