use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_assignment};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::{is_course_member, load_course};
use crate::services::{current_user, forbidden, storage_failure};

pub async fn get_assignment(
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

    match is_course_member(&storage, &user, &course).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment retrieved successfully",
        ))),
        Ok(false) => Ok(forbidden("You are not a member of this course")),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to check course membership",
            e,
        )),
    }
}
