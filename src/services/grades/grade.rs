use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::grades::{
    requests::{GradeSubmissionRequest, NewGrade},
    responses::GradeResponse,
};
use crate::models::notifications::entities::{NotificationTemplate, NotificationType};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::load_assignment;
use crate::services::courses::{can_manage_course, load_course};
use crate::services::notifications::NotificationDispatcher;
use crate::services::{bad_request, current_user, not_found, storage_failure};

const MAX_FEEDBACK_CHARS: usize = 5_000;

/// 分数必须落在 [0, total_points]
pub fn check_score(score: f64, total_points: f64) -> Result<(), String> {
    if !score.is_finite() || score < 0.0 || score > total_points {
        return Err(format!("Score must be between 0 and {total_points}"));
    }
    Ok(())
}

/// 评分或改分；提交标记为 graded，并通知学生
pub async fn grade_submission(
    service: &GradeService,
    submission_id: i64,
    grade: GradeSubmissionRequest,
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
    let assignment = match load_assignment(&storage, submission.assignment_id).await {
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
            "You do not have permission to grade this submission",
        )));
    }

    if let Err(msg) = check_score(grade.score, assignment.total_points) {
        return Ok(bad_request(ErrorCode::GradeScoreOutOfRange, msg));
    }
    let feedback = grade
        .feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());
    if let Some(ref feedback) = feedback
        && feedback.chars().count() > MAX_FEEDBACK_CHARS
    {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            format!("Feedback must be at most {MAX_FEEDBACK_CHARS} characters"),
        ));
    }

    let new_grade = NewGrade {
        submission_id: submission.id,
        assignment_id: assignment.id,
        course_id: course.id,
        student_id: submission.student_id,
        score: grade.score,
        feedback,
        graded_by: user.id,
    };

    let grade = match storage.upsert_grade(new_grade).await {
        Ok(grade) => grade,
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to save grade",
                e,
            ));
        }
    };

    let template = NotificationTemplate::new(
        NotificationType::GradeReleased,
        format!("{} graded: {}", course.code, assignment.title),
    )
    .content(format!("Score {} / {}", grade.score, assignment.total_points))
    .reference("grade", grade.id);
    NotificationDispatcher::notify(&storage, submission.student_id, &template).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GradeResponse { grade },
        "Submission graded successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_score_bounds() {
        assert!(check_score(0.0, 100.0).is_ok());
        assert!(check_score(100.0, 100.0).is_ok());
        assert!(check_score(57.5, 100.0).is_ok());
        assert!(check_score(-0.5, 100.0).is_err());
        assert!(check_score(100.5, 100.0).is_err());
        assert!(check_score(f64::NAN, 100.0).is_err());
    }
}
