use serde::Serialize;
use ts_rs::TS;

/// 前端用于检测新版本的信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pwa.ts")]
pub struct PwaVersionResponse {
    pub version: String,
    pub cache_name: String,
}
