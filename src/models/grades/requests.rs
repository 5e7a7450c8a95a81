use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::query::deserialize_optional_i64;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub assignment_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct GradeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub course_id: Option<i64>,
    pub assignment_id: Option<i64>,
    pub student_id: Option<i64>,
    /// 只返回该讲师所授课程的成绩
    pub lecturer_id: Option<i64>,
}

// 写入存储层的评分
#[derive(Debug, Clone)]
pub struct NewGrade {
    pub submission_id: i64,
    pub assignment_id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub score: f64,
    pub feedback: Option<String>,
    pub graded_by: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct TranscriptParams {
    /// 缺省为当前用户
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
}
