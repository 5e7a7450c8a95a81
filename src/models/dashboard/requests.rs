use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct PermissionCheckQuery {
    /// `resource:action` 形式
    pub permission: String,
}
