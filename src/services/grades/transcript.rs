use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use super::gpa::build_transcript;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, storage_failure};

/// 学生只能查看自己的成绩单；教职工可查看任意学生
pub async fn get_transcript(
    service: &GradeService,
    student_id: Option<i64>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let student_id = student_id.unwrap_or(user.id);
    if student_id != user.id && !user.role.is_staff() {
        return Ok(forbidden("You can only view your own transcript"));
    }

    let storage = service.get_storage(request)?;

    match storage.list_course_scores_for_student(student_id).await {
        Ok(totals) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            build_transcript(student_id, totals),
            "Transcript retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to build transcript",
            e,
        )),
    }
}
