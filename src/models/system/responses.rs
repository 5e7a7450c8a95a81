use serde::Serialize;
use ts_rs::TS;

use super::entities::{SettingAudit, SystemSetting};
use crate::models::common::PaginationInfo;

/// 公开系统设置
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemSettingsResponse {
    pub system_name: String,
    pub max_file_size: u64,
    pub allowed_file_types: Vec<String>,
    pub allow_registration: bool,
    pub registration_threshold: f64,
    pub currency: String,
    pub app_version: String,
    pub environment: String,
}

/// 管理员配置列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct AdminSettingsListResponse {
    pub settings: Vec<SystemSetting>,
}

/// 单个配置响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SettingResponse {
    pub setting: SystemSetting,
}

/// 审计日志列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SettingAuditListResponse {
    pub audits: Vec<SettingAudit>,
    pub pagination: PaginationInfo,
}
