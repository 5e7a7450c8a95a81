use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub total_points: f64,
    pub attachment_token: Option<String>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    /// 截止时间已过（无截止时间视为未过期）
    pub fn is_past_due(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.due_date.is_some_and(|due| now > due)
    }
}

// 学生待完成作业
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpcomingAssignment {
    pub assignment: Assignment,
    pub course_code: String,
    pub course_title: String,
}
