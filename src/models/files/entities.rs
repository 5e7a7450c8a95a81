use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct FileRecord {
    pub download_token: String,
    pub original_name: String,
    /// 磁盘上的随机文件名，不对外暴露
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub stored_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub user_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
