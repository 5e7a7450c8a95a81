use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, check_attachment, load_assignment, validate_total_points};
use crate::models::assignments::requests::UpdateAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::{can_manage_course, load_course};
use crate::services::{bad_request, current_user, not_found, storage_failure};
use crate::utils::validate::validate_text;

pub async fn update_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    mut update: UpdateAssignmentRequest,
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
            "You do not have permission to modify this assignment",
        )));
    }

    if let Some(ref title) = update.title {
        if let Err(msg) = validate_text("title", title, 200) {
            return Ok(bad_request(ErrorCode::AssignmentInvalid, msg));
        }
        update.title = Some(title.trim().to_string());
    }
    if let Some(points) = update.total_points {
        if let Err(msg) = validate_total_points(points) {
            return Ok(bad_request(ErrorCode::AssignmentInvalid, msg));
        }
        // 已评分数不能超过新的满分
        match storage.max_grade_score(assignment_id).await {
            Ok(Some(max_score)) if points < max_score => {
                return Ok(bad_request(
                    ErrorCode::GradeScoreOutOfRange,
                    format!("Total points cannot be lower than an existing score of {max_score}"),
                ));
            }
            Ok(_) => {}
            Err(e) => {
                return Ok(storage_failure(
                    ErrorCode::InternalServerError,
                    "Failed to check existing grades",
                    e,
                ));
            }
        }
    }
    if let Some(ref token) = update.attachment_token
        && let Err(resp) = check_attachment(&storage, token).await
    {
        return Ok(resp);
    }

    match storage.update_assignment(assignment_id, update).await {
        Ok(Some(assignment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::AssignmentNotFound, "Assignment not found")),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to update assignment",
            e,
        )),
    }
}
