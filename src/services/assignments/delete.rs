use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_assignment};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::{can_manage_course, load_course};
use crate::services::{current_user, not_found, storage_failure};

/// 提交与成绩随作业级联删除
pub async fn delete_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let assignment = match load_assignment(&storage, assignment_id).await {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };
    let course = match load_course(&storage, assignment.course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if !can_manage_course(&user, &course) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to delete this assignment",
        )));
    }

    match storage.delete_assignment(assignment_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Assignment deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::AssignmentNotFound, "Assignment not found")),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to delete assignment",
            e,
        )),
    }
}
