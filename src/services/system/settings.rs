use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DynamicConfig, SystemService};
use crate::models::{
    ApiResponse, ErrorCode,
    system::{
        entities::KnownSettingKey,
        requests::{SettingAuditQuery, UpdateSettingRequest},
        responses::{AdminSettingsListResponse, SettingResponse, SystemSettingsResponse},
    },
};
use crate::services::{bad_request, current_user, not_found, storage_failure};

/// 公开系统设置（只读）
pub async fn get_settings(
    service: &SystemService,
    _req: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let response = SystemSettingsResponse {
        system_name: DynamicConfig::system_name().await,
        max_file_size: DynamicConfig::upload_max_size().await as u64,
        allowed_file_types: DynamicConfig::upload_allowed_types().await,
        allow_registration: DynamicConfig::allow_registration().await,
        registration_threshold: DynamicConfig::registration_threshold().await,
        currency: config.fees.currency.clone(),
        app_version: DynamicConfig::pwa_app_version().await,
        environment: config.app.environment.clone(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Settings retrieved successfully",
    )))
}

pub async fn get_admin_settings(
    service: &SystemService,
    req: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(req)?;

    match storage.list_all_settings().await {
        Ok(settings) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AdminSettingsListResponse { settings },
            "Admin settings retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to list settings",
            e,
        )),
    }
}

/// 按键类型校验后写入，记录审计并刷新内存缓存
pub async fn update_setting(
    service: &SystemService,
    key: String,
    update: UpdateSettingRequest,
    req: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let known: KnownSettingKey = match key.parse() {
        Ok(known) => known,
        Err(_) => {
            return Ok(not_found(
                ErrorCode::SettingNotFound,
                "Unknown setting key",
            ));
        }
    };
    let value = update.value.trim().to_string();
    if let Err(msg) = known.validate(&value) {
        return Ok(bad_request(ErrorCode::SettingInvalid, msg));
    }

    let storage = service.get_storage(req)?;

    let ip_address = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    let setting = match storage
        .update_setting(known.as_str(), &value, user.id, ip_address)
        .await
    {
        Ok(setting) => setting,
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to update setting",
                e,
            ));
        }
    };

    DynamicConfig::update(known.as_str(), &value).await;
    tracing::info!("Setting {} updated by user {}", known.as_str(), user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SettingResponse { setting },
        "Setting updated successfully",
    )))
}

pub async fn get_setting_audits(
    service: &SystemService,
    query: SettingAuditQuery,
    req: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(req)?;

    match storage.list_setting_audits(query).await {
        Ok(audits) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            audits,
            "Setting audits retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to list setting audits",
            e,
        )),
    }
}
