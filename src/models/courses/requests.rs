use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::query::{deserialize_optional_bool, deserialize_optional_i64};

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub credits: i32,
    /// 仅院长/管理员可指定，讲师创建时固定为本人
    pub lecturer_id: Option<i64>,
    pub department: Option<String>,
    pub semester: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub credits: Option<i32>,
    pub lecturer_id: Option<i64>,
    pub department: Option<String>,
    pub semester: Option<String>,
}

// 课程列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub department: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub lecturer_id: Option<i64>,
    /// 只看自己选修/讲授的课程
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub mine: Option<bool>,
}

// 课程列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub department: Option<String>,
    pub lecturer_id: Option<i64>,
    /// 限定为该学生处于 active 状态的选课
    pub enrolled_student_id: Option<i64>,
}
