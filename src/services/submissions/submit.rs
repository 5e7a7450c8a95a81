use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::courses::entities::EnrollmentStatus;
use crate::models::submissions::{
    entities::SubmissionStatus,
    requests::{NewSubmission, SubmitAssignmentRequest},
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::load_assignment;
use crate::services::{bad_request, current_user, forbidden, storage_failure};

const MAX_CONTENT_CHARS: usize = 20_000;

/// 去掉空白内容；两项都为空时返回 None
fn normalize_payload(
    content: Option<String>,
    file_token: Option<String>,
) -> Option<(Option<String>, Option<String>)> {
    let content = content
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    let file_token = file_token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    if content.is_none() && file_token.is_none() {
        None
    } else {
        Some((content, file_token))
    }
}

/// 每个学生每份作业只有一条提交；评分前可以覆盖，截止后提交记为 late
pub async fn submit(
    service: &SubmissionService,
    assignment_id: i64,
    submission: SubmitAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if user.role != UserRole::Student {
        return Ok(forbidden("Only students can submit assignments"));
    }

    let Some((content, file_token)) = normalize_payload(submission.content, submission.file_token)
    else {
        return Ok(bad_request(
            ErrorCode::SubmissionInvalid,
            "Either content or a file is required",
        ));
    };
    if let Some(ref content) = content
        && content.chars().count() > MAX_CONTENT_CHARS
    {
        return Ok(bad_request(
            ErrorCode::SubmissionInvalid,
            format!("Content must be at most {MAX_CONTENT_CHARS} characters"),
        ));
    }

    let storage = service.get_storage(request)?;

    let assignment = match load_assignment(&storage, assignment_id).await {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };

    match storage.get_enrollment(assignment.course_id, user.id).await {
        Ok(Some(enrollment)) if enrollment.status == EnrollmentStatus::Active => {}
        Ok(_) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::NotEnrolled,
                "You are not enrolled in this course",
            )));
        }
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to load enrollment",
                e,
            ));
        }
    }

    // 附件只能是自己上传的文件
    if let Some(ref token) = file_token {
        match storage.get_file_by_token(token).await {
            Ok(Some(file)) if file.user_id == user.id => {}
            Ok(_) => {
                return Ok(bad_request(
                    ErrorCode::SubmissionInvalid,
                    "Attached file not found",
                ));
            }
            Err(e) => {
                return Ok(storage_failure(
                    ErrorCode::InternalServerError,
                    "Failed to check attached file",
                    e,
                ));
            }
        }
    }

    match storage.get_submission_for_student(assignment.id, user.id).await {
        Ok(Some(existing)) if existing.status == SubmissionStatus::Graded => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::SubmissionAlreadyGraded,
                "Submission has already been graded",
            )));
        }
        Ok(_) => {}
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to load submission",
                e,
            ));
        }
    }

    let status = if assignment.is_past_due(chrono::Utc::now()) {
        SubmissionStatus::Late
    } else {
        SubmissionStatus::Submitted
    };

    let record = NewSubmission {
        assignment_id: assignment.id,
        student_id: user.id,
        content,
        file_token,
        status,
    };

    match storage.upsert_submission(record).await {
        Ok(submission) => {
            tracing::info!(
                "Student {} submitted assignment {} ({})",
                user.id,
                assignment.id,
                submission.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submission,
                "Submission saved successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to save submission",
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_payload() {
        assert!(normalize_payload(None, None).is_none());
        assert!(normalize_payload(Some("   ".into()), Some(String::new())).is_none());
        assert_eq!(
            normalize_payload(Some(" answer ".into()), None),
            Some((Some("answer".to_string()), None))
        );
        assert_eq!(
            normalize_payload(None, Some("abc".into())),
            Some((None, Some("abc".to_string())))
        );
    }
}
