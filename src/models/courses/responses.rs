use serde::Serialize;
use ts_rs::TS;

use super::entities::{Course, EnrolledStudent, Enrollment};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListResponse {
    pub items: Vec<Course>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseDetailResponse {
    pub course: Course,
    pub lecturer_name: Option<String>,
    pub enrolled_count: i64,
    /// 当前学生的选课状态（非学生为空）
    pub my_enrollment: Option<Enrollment>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct EnrollmentResponse {
    pub enrollment: Enrollment,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseStudentsResponse {
    pub items: Vec<EnrolledStudent>,
}
