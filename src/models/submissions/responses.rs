use serde::Serialize;
use ts_rs::TS;

use super::entities::Submission;
use crate::models::common::PaginationInfo;
use crate::models::grades::entities::Grade;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<Submission>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionDetailResponse {
    pub submission: Submission,
    pub grade: Option<Grade>,
}
