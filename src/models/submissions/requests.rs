use serde::Deserialize;
use ts_rs::TS;

use super::entities::SubmissionStatus;
use crate::models::common::PaginationQuery;
use crate::models::common::query::deserialize_optional_i64;

// 提交/重新提交作业；content 与 file_token 至少一项
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitAssignmentRequest {
    pub content: Option<String>,
    pub file_token: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub assignment_id: Option<i64>,
    pub status: Option<SubmissionStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub assignment_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<SubmissionStatus>,
}

// 写入存储层的提交内容
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub file_token: Option<String>,
    pub status: SubmissionStatus,
}
