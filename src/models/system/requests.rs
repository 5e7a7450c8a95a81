use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::query::deserialize_optional_i64;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct UpdateSettingRequest {
    /// 一律以字符串提交，按键的类型校验
    pub value: String,
}

/// 审计日志查询；可按配置键或操作人过滤
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SettingAuditQuery {
    pub key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub changed_by: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub size: Option<i64>,
}
