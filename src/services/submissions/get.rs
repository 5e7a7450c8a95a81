use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::responses::SubmissionDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::load_assignment;
use crate::services::courses::{can_manage_course, load_course};
use crate::services::{current_user, forbidden, not_found, storage_failure};

/// 提交者本人或课程管理者可查看，附带成绩
pub async fn get_submission(
    service: &SubmissionService,
    submission_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => return Ok(not_found(ErrorCode::SubmissionNotFound, "Submission not found")),
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to load submission",
                e,
            ));
        }
    };

    if submission.student_id != user.id {
        if !user.role.is_staff() {
            return Ok(forbidden("You can only view your own submissions"));
        }
        let assignment = match load_assignment(&storage, submission.assignment_id).await {
            Ok(assignment) => assignment,
            Err(resp) => return Ok(resp),
        };
        let course = match load_course(&storage, assignment.course_id).await {
            Ok(course) => course,
            Err(resp) => return Ok(resp),
        };
        if !can_manage_course(&user, &course) {
            return Ok(forbidden("You do not have permission to view this submission"));
        }
    }

    let grade = match storage.get_grade_by_submission(submission.id).await {
        Ok(grade) => grade,
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to load grade",
                e,
            ));
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionDetailResponse { submission, grade },
        "Submission retrieved successfully",
    )))
}
