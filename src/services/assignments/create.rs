use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, check_attachment, validate_total_points};
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::notifications::entities::{NotificationTemplate, NotificationType};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::{can_manage_course, load_course};
use crate::services::notifications::NotificationDispatcher;
use crate::services::{bad_request, current_user, storage_failure};
use crate::utils::validate::validate_text;

/// 布置作业并通知课程内所有在读学生
pub async fn create_assignment(
    service: &AssignmentService,
    mut assignment: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    assignment.title = assignment.title.trim().to_string();
    if let Err(msg) = validate_text("title", &assignment.title, 200) {
        return Ok(bad_request(ErrorCode::AssignmentInvalid, msg));
    }
    if let Err(msg) = validate_total_points(assignment.total_points) {
        return Ok(bad_request(ErrorCode::AssignmentInvalid, msg));
    }

    let storage = service.get_storage(request)?;

    let course = match load_course(&storage, assignment.course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if !can_manage_course(&user, &course) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to add assignments to this course",
        )));
    }

    if let Some(ref token) = assignment.attachment_token
        && let Err(resp) = check_attachment(&storage, token).await
    {
        return Ok(resp);
    }

    let assignment = match storage.create_assignment(user.id, assignment).await {
        Ok(assignment) => assignment,
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to create assignment",
                e,
            ));
        }
    };

    match storage.list_active_student_ids(course.id).await {
        Ok(students) => {
            let mut template = NotificationTemplate::new(
                NotificationType::AssignmentCreated,
                format!("New assignment in {}: {}", course.code, assignment.title),
            )
            .reference("assignment", assignment.id);
            if let Some(due) = assignment.due_date {
                template = template.content(format!("Due {}", due.format("%Y-%m-%d %H:%M UTC")));
            }
            NotificationDispatcher::fan_out(&storage, students, &template).await;
        }
        Err(e) => tracing::warn!(
            "Failed to load students of course {} for notification: {}",
            course.id,
            e
        ),
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(
        assignment,
        "Assignment created successfully",
    )))
}
