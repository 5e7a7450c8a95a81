use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub submission_id: i64,
    pub assignment_id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub score: f64,
    pub feedback: Option<String>,
    pub graded_by: i64,
    pub graded_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 成绩单中的一门课程
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct TranscriptRow {
    pub course_id: i64,
    pub code: String,
    pub title: String,
    pub credits: i32,
    pub percentage: f64,
    pub letter: String,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Transcript {
    pub student_id: i64,
    pub rows: Vec<TranscriptRow>,
    pub gpa: f64,
    pub total_credits: i32,
}

/// 某学生在一门课程上已评分作业的得分汇总
#[derive(Debug, Clone)]
pub struct CourseScoreTotals {
    pub course_id: i64,
    pub code: String,
    pub title: String,
    pub credits: i32,
    pub score_sum: f64,
    pub points_sum: f64,
}
